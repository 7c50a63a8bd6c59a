use crate::config::ZeroOutSettings;
use crate::tools::{confirm_action, has_extension, list_direct_files, validate_directory_exists};
use anyhow::{Context, Result, bail};
use console::style;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ZeroOutOptions {
    pub directory: PathBuf,
    pub extension: String,
    pub assume_yes: bool,
    pub retry_delay: Duration,
    /// `None` 表示無限重試直到成功或中斷
    pub max_attempts: Option<u32>,
}

impl ZeroOutOptions {
    #[must_use]
    pub fn from_settings(directory: PathBuf, settings: &ZeroOutSettings, assume_yes: bool) -> Self {
        Self {
            directory,
            extension: "mp4".to_string(),
            assume_yes,
            retry_delay: Duration::from_secs(settings.retry_delay_secs),
            max_attempts: settings.max_attempts,
        }
    }
}

#[derive(Debug, Default)]
pub struct ZeroOutResult {
    pub files_zeroed: usize,
    pub attempts: u32,
}

/// 將資料夾內的影片檔清成 0 位元組（保留檔名）
pub struct ZeroOut {
    shutdown_signal: Arc<AtomicBool>,
}

impl ZeroOut {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    pub fn run(&self, options: &ZeroOutOptions) -> Result<ZeroOutResult> {
        println!("{}", style("=== 清空影片檔案 ===").cyan().bold());

        validate_directory_exists(&options.directory)?;
        let files: Vec<PathBuf> = list_direct_files(&options.directory)?
            .into_iter()
            .filter(|p| has_extension(p, &options.extension))
            .collect();

        if files.is_empty() {
            println!(
                "{}",
                style(format!("找不到任何 .{} 檔案", options.extension)).yellow()
            );
            return Ok(ZeroOutResult::default());
        }

        println!("{} 個檔案將被清空:", style(files.len()).yellow());
        for file in &files {
            println!("  {}", file.display());
        }
        println!();

        if !confirm_action("確定要繼續嗎？", options.assume_yes)? {
            println!("{}", style("操作已取消").yellow());
            return Ok(ZeroOutResult::default());
        }

        let attempts = self.zero_with_retry(&files, options)?;
        println!("{}", style("完成").green());
        info!("已清空 {} 個檔案（嘗試 {attempts} 次）", files.len());

        Ok(ZeroOutResult {
            files_zeroed: files.len(),
            attempts,
        })
    }

    /// 任何錯誤都以固定間隔重試整批操作
    fn zero_with_retry(&self, files: &[PathBuf], options: &ZeroOutOptions) -> Result<u32> {
        let mut attempts: u32 = 0;

        loop {
            attempts = next_attempt(attempts);
            let error = match truncate_all(files) {
                Ok(()) => return Ok(attempts),
                Err(e) => e,
            };

            if options.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(error.context(format!("已嘗試 {attempts} 次仍失敗")));
            }
            if self.shutdown_signal.load(Ordering::SeqCst) {
                bail!("收到中斷訊號，停止重試: {error:#}");
            }

            warn!("清空失敗（第 {attempts} 次）: {error:#}");
            println!(
                "{} {error:#}，{} 秒後重試...",
                style("發生錯誤:").red(),
                options.retry_delay.as_secs_f64()
            );
            thread::sleep(options.retry_delay);
        }
    }
}

/// 無限重試時計數停在 `u32::MAX`
const fn next_attempt(attempts: u32) -> u32 {
    attempts.saturating_add(1)
}

fn truncate_all(files: &[PathBuf]) -> Result<()> {
    for file in files {
        truncate_file(file)?;
    }
    Ok(())
}

fn truncate_file(path: &Path) -> Result<()> {
    fs::write(path, b"").with_context(|| format!("無法清空檔案: {}", path.display()))
}
