use super::image_resize::{ImageResize, is_resource_fork, resize_image_in_place};
use crate::config::Config;
use crate::tools::{
    create_progress_bar, extract_comic_archive, file_size_mb, scan_files_recursive,
    validate_directory_exists, zip_directory,
};
use anyhow::{Context, Result, bail};
use console::style;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const RESIZED_SUFFIX: &str = ".rsz.cbz";

#[derive(Debug, Clone)]
pub struct ComicResizerOptions {
    pub directory: PathBuf,
    pub max_dimension: u32,
    pub keep_original: bool,
}

/// 單一壓縮檔的處理結果
#[derive(Debug, Clone)]
pub struct ResizeReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub original_mb: f64,
    pub resized_mb: f64,
    pub images_resized: usize,
    /// 最後一張處理的圖片解析度
    pub last_image: Option<ImageResize>,
}

#[derive(Debug, Default)]
pub struct ComicResizerSummary {
    pub reports: Vec<ResizeReport>,
    pub errors: usize,
}

/// 漫畫壓縮檔縮圖元件
pub struct ComicResizer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl ComicResizer {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self, options: &ComicResizerOptions) -> Result<ComicResizerSummary> {
        println!("{}", style("=== 漫畫壓縮檔縮圖 ===").cyan().bold());

        if options.max_dimension == 0 {
            bail!("最大尺寸必須大於 0");
        }
        validate_directory_exists(&options.directory)?;

        let archives = self.find_archives(&options.directory);
        if archives.is_empty() {
            println!("{}", style("找不到 CBZ/CBR 檔案").yellow());
            return Ok(ComicResizerSummary::default());
        }
        println!("找到 {} 個漫畫壓縮檔", style(archives.len()).green());

        let mut summary = ComicResizerSummary::default();
        for archive in &archives {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止處理");
                break;
            }

            match self.process_archive(archive, options) {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    summary.errors += 1;
                    warn!("處理失敗 {}: {e:#}", archive.display());
                    eprintln!("{} {e:#}", style("錯誤:").red().bold());
                }
            }
        }

        Self::print_summary(&summary);
        Ok(summary)
    }

    fn find_archives(&self, directory: &Path) -> Vec<PathBuf> {
        scan_files_recursive(directory, |path| {
            self.config.file_type_table.is_comic_archive(path) && !is_resized_output(path)
        })
    }

    fn process_archive(&self, archive: &Path, options: &ComicResizerOptions) -> Result<ResizeReport> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("\n處理: {}", style(&name).cyan());

        let work_dir = std::env::temp_dir().join(format!("comic-resize-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&work_dir)
            .with_context(|| format!("無法建立暫存資料夾: {}", work_dir.display()))?;

        let result = self.resize_into(archive, &work_dir, options);

        if let Err(e) = fs::remove_dir_all(&work_dir) {
            warn!("無法刪除暫存資料夾 {}: {e}", work_dir.display());
        }

        let (output, images_resized, last_image) = result?;
        let report = ResizeReport {
            source: archive.to_path_buf(),
            original_mb: file_size_mb(archive)?,
            resized_mb: file_size_mb(&output)?,
            output,
            images_resized,
            last_image,
        };

        if !options.keep_original {
            trash::delete(archive)
                .with_context(|| format!("無法移到垃圾桶: {}", archive.display()))?;
            debug!("已將原始檔移到垃圾桶: {}", archive.display());
        }

        info!(
            "{} -> {} ({:.2} MB -> {:.2} MB)",
            report.source.display(),
            report.output.display(),
            report.original_mb,
            report.resized_mb
        );
        Ok(report)
    }

    fn resize_into(
        &self,
        archive: &Path,
        work_dir: &Path,
        options: &ComicResizerOptions,
    ) -> Result<(PathBuf, usize, Option<ImageResize>)> {
        extract_comic_archive(archive, work_dir)?;

        let images = scan_files_recursive(work_dir, |path| {
            !is_resource_fork(path) && self.config.file_type_table.is_image_file(path)
        });

        let progress_bar = create_progress_bar(images.len() as u64, "縮圖中");
        let mut resized = 0;
        let mut last_image = None;
        for image in &images {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("已中斷");
                bail!("收到中斷訊號");
            }

            match resize_image_in_place(image, options.max_dimension) {
                Ok(result) => {
                    if result.changed() {
                        resized += 1;
                    }
                    last_image = Some(result);
                }
                Err(e) => warn!("略過圖片 {}: {e:#}", image.display()),
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_with_message("完成");

        let output = resized_output_path(archive);
        zip_directory(work_dir, &output)?;
        Ok((output, resized, last_image))
    }

    fn print_summary(summary: &ComicResizerSummary) {
        println!();
        println!("{}", style("=== 處理結果 ===").cyan().bold());
        println!(
            "{:<40} {:>11} {:>11} {:>10} {:>10}",
            "檔案", "原始解析度", "縮圖解析度", "原始 (MB)", "縮圖 (MB)"
        );
        println!("{}", "-".repeat(86));
        for report in &summary.reports {
            let name = report
                .output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (before, after) = report.last_image.map_or_else(
                || ("-".to_string(), "-".to_string()),
                |img| {
                    (
                        format!("{}x{}", img.original.0, img.original.1),
                        format!("{}x{}", img.resized.0, img.resized.1),
                    )
                },
            );
            println!(
                "{:<40} {:>11} {:>11} {:>10.2} {:>10.2}",
                name, before, after, report.original_mb, report.resized_mb
            );
        }
        if summary.errors > 0 {
            println!("\n失敗: {} 個", style(summary.errors).red());
        }
    }
}

/// `book.cbr` -> `book.rsz.cbz`（同資料夾）
#[must_use]
pub fn resized_output_path(archive: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    archive.with_file_name(format!("{stem}{RESIZED_SUFFIX}"))
}

fn is_resized_output(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_ascii_lowercase().ends_with(RESIZED_SUFFIX))
}
