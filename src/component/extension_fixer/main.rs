use crate::tools::{confirm_action, list_direct_files, validate_directory_exists};
use anyhow::Result;
use console::style;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
pub struct ExtensionFixerOptions {
    pub directory: PathBuf,
    /// 要補上的副檔名（不含前導點）
    pub extension: String,
    pub assume_yes: bool,
}

#[derive(Debug, Default)]
pub struct ExtensionFixResult {
    pub renamed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// 為資料夾內缺少副檔名的檔案補上副檔名
pub struct ExtensionFixer {
    shutdown_signal: Arc<AtomicBool>,
}

/// 產生補上副檔名後的檔名；已經有該副檔名時回傳 `None`
#[must_use]
pub fn target_file_name(file_name: &str, extension: &str) -> Option<String> {
    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());
    if file_name.to_lowercase().ends_with(&suffix) {
        return None;
    }
    Some(format!("{file_name}{suffix}"))
}

impl ExtensionFixer {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    pub fn run(&self, options: &ExtensionFixerOptions) -> Result<ExtensionFixResult> {
        println!("{}", style("=== 補上副檔名 ===").cyan().bold());

        validate_directory_exists(&options.directory)?;
        let files = list_direct_files(&options.directory)?;

        if files.is_empty() {
            println!("{}", style("資料夾內沒有任何檔案").yellow());
            return Ok(ExtensionFixResult::default());
        }

        println!(
            "將為 {} 內的檔案加上 '.{}'，已有此副檔名的檔案會略過",
            options.directory.display(),
            options.extension
        );
        if !confirm_action("確定要繼續嗎？", options.assume_yes)? {
            println!("{}", style("操作已取消").yellow());
            return Ok(ExtensionFixResult::default());
        }

        let result = self.rename_files(&files, &options.extension);
        Self::print_result(&result);
        Ok(result)
    }

    fn rename_files(&self, files: &[PathBuf], extension: &str) -> ExtensionFixResult {
        let mut result = ExtensionFixResult::default();

        for path in files {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止處理");
                break;
            }

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let Some(new_name) = target_file_name(&file_name, extension) else {
                println!("  {} '{file_name}' 已有 .{extension}", style("略過").dim());
                result.skipped += 1;
                continue;
            };

            let new_path = path.parent().unwrap_or(Path::new(".")).join(&new_name);
            if new_path.exists() {
                println!(
                    "  {} '{new_name}' 已存在，略過 '{file_name}'",
                    style("警告:").yellow()
                );
                result.skipped += 1;
                continue;
            }

            match fs::rename(path, &new_path) {
                Ok(()) => {
                    println!("  已重新命名: '{file_name}' -> '{new_name}'");
                    result.renamed += 1;
                }
                Err(e) => {
                    warn!("無法重新命名 {}: {e}", path.display());
                    println!("  {} '{file_name}': {e}", style("失敗").red());
                    result.errors += 1;
                }
            }
        }

        result
    }

    fn print_result(result: &ExtensionFixResult) {
        println!();
        println!("  已重新命名: {} 個", style(result.renamed).green());
        if result.skipped > 0 {
            println!("  已略過: {} 個", style(result.skipped).yellow());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }

        info!(
            "副檔名補齊完成 - 重新命名: {}, 略過: {}, 失敗: {}",
            result.renamed, result.skipped, result.errors
        );
    }
}
