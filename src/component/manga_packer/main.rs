use crate::config::Config;
use crate::tools::{
    list_direct_files, list_direct_subdirectories, sort_paths_naturally, validate_directory_exists,
    zip_files_flat,
};
use anyhow::{Context, Result};
use console::style;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct MangaPackerOptions {
    pub path: PathBuf,
    /// 將 `path` 視為漫畫庫，處理其中每一部漫畫
    pub batch: bool,
    /// 轉換後將原始章節資料夾移到垃圾桶
    pub delete_original: bool,
}

#[derive(Debug, Default)]
pub struct PackResult {
    pub archives_created: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl PackResult {
    fn merge(&mut self, other: &Self) {
        self.archives_created += other.archives_created;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }
}

/// 漫畫章節資料夾轉 CBZ 元件
pub struct MangaPacker {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl MangaPacker {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self, options: &MangaPackerOptions) -> Result<PackResult> {
        println!("{}", style("=== 漫畫資料夾轉 CBZ ===").cyan().bold());
        validate_directory_exists(&options.path)?;

        let result = if options.batch {
            self.pack_library(&options.path, options.delete_original)?
        } else {
            self.pack_manga(&options.path, options.delete_original)?
        };

        Self::print_result(&result);
        Ok(result)
    }

    fn pack_library(&self, library: &Path, delete_original: bool) -> Result<PackResult> {
        let mut total = PackResult::default();

        for manga in list_direct_subdirectories(library)? {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止處理");
                break;
            }

            let name = display_name(&manga);
            println!("\n{}", "=".repeat(50));
            println!("處理漫畫: {}", style(&name).cyan());
            println!("{}", "=".repeat(50));

            match self.pack_manga(&manga, delete_original) {
                Ok(result) => total.merge(&result),
                Err(e) => {
                    total.errors += 1;
                    eprintln!("{} {name}: {e:#}", style("錯誤:").red().bold());
                }
            }
        }

        Ok(total)
    }

    /// 將漫畫資料夾中的每個章節子資料夾壓縮成同層的 `<章節>.cbz`
    fn pack_manga(&self, manga: &Path, delete_original: bool) -> Result<PackResult> {
        let mut result = PackResult::default();

        for chapter in list_direct_subdirectories(manga)? {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                break;
            }

            match self.pack_chapter(&chapter, delete_original) {
                Ok(true) => result.archives_created += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    result.errors += 1;
                    warn!("章節轉換失敗 {}: {e:#}", chapter.display());
                    eprintln!("  {} {e:#}", style("錯誤:").red());
                }
            }
        }

        Ok(result)
    }

    fn pack_chapter(&self, chapter: &Path, delete_original: bool) -> Result<bool> {
        let name = display_name(chapter);
        println!("處理章節: {name}");

        let mut images = self.collect_images(chapter)?;
        if images.is_empty() {
            println!("  {}", style(format!("{name} 內沒有圖片")).yellow());
            return Ok(false);
        }
        sort_paths_naturally(&mut images);

        let cbz_path = chapter_archive_path(chapter);
        zip_files_flat(&images, &cbz_path)?;
        for image in &images {
            println!("  已加入: {}", display_name(image));
        }
        println!("  {} {}", style("已建立:").green(), display_name(&cbz_path));

        if delete_original {
            trash::delete(chapter)
                .with_context(|| format!("無法移到垃圾桶: {}", chapter.display()))?;
            println!("  已刪除原始資料夾: {name}");
        }

        info!("已建立 {} ({} 張圖片)", cbz_path.display(), images.len());
        Ok(true)
    }

    fn collect_images(&self, chapter: &Path) -> Result<Vec<PathBuf>> {
        Ok(list_direct_files(chapter)?
            .into_iter()
            .filter(|p| self.config.file_type_table.is_image_file(p))
            .collect())
    }

    fn print_result(result: &PackResult) {
        println!();
        println!("{}", style("=== 轉換結果 ===").cyan().bold());
        println!("  已建立: {} 個 CBZ", style(result.archives_created).green());
        if result.skipped > 0 {
            println!("  已略過: {} 個資料夾", style(result.skipped).yellow());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }
    }
}

/// `manga/Chapter 01` -> `manga/Chapter 01.cbz`
#[must_use]
pub fn chapter_archive_path(chapter: &Path) -> PathBuf {
    let parent = chapter.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}.cbz", display_name(chapter)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
