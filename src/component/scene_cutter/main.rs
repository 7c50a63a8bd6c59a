use super::cut_list::{CutList, cut_list_file_name};
use super::scene_detector::{SceneDetector, SceneDetectorConfig};
use crate::config::Config;
use crate::tools::{
    ensure_directory_exists, has_extension, scan_files_recursive, validate_directory_exists,
};
use anyhow::{Result, bail};
use console::style;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 場景切割執行參數
#[derive(Debug, Clone)]
pub struct SceneCutterOptions {
    pub files_dir: PathBuf,
    /// 輸出資料夾，預設與 `files_dir` 相同
    pub out_dir: Option<PathBuf>,
    pub detector: SceneDetectorConfig,
}

#[derive(Debug, Default)]
pub struct SceneCutterSummary {
    pub files_processed: usize,
    pub segments_written: usize,
    pub errors: usize,
}

/// 場景切割元件：偵測場景變換並輸出 LosslessCut 專案檔
pub struct SceneCutter {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl SceneCutter {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self, options: &SceneCutterOptions) -> Result<SceneCutterSummary> {
        println!("{}", style("=== 場景變換偵測 ===").cyan().bold());

        Self::validate_options(options)?;
        validate_directory_exists(&options.files_dir)?;

        let out_dir = options
            .out_dir
            .clone()
            .unwrap_or_else(|| options.files_dir.clone());
        ensure_directory_exists(&out_dir)?;

        let extension = &self.config.settings.scene_cutter.media_extension;
        let files = scan_files_recursive(&options.files_dir, |p| has_extension(p, extension));

        if files.is_empty() {
            println!(
                "{}",
                style(format!("找不到任何 .{extension} 檔案")).yellow()
            );
            return Ok(SceneCutterSummary::default());
        }

        let detector = SceneDetector::new(
            &self.config.settings.ffmpeg_path,
            &self.config.settings.ffprobe_path,
        );
        let mut summary = SceneCutterSummary::default();

        for file in &files {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止處理");
                break;
            }

            match Self::process_file(&detector, file, &out_dir, &options.detector) {
                Ok(count) => {
                    summary.files_processed += 1;
                    summary.segments_written += count;
                }
                Err(e) => {
                    summary.errors += 1;
                    warn!("處理失敗 {}: {e:#}", file.display());
                    eprintln!("{} {e:#}", style("錯誤:").red().bold());
                }
            }
        }

        Self::print_summary(&summary);
        Ok(summary)
    }

    fn validate_options(options: &SceneCutterOptions) -> Result<()> {
        let detector = &options.detector;
        if !detector.from_time.is_finite() || detector.to_time.is_some_and(|t| !t.is_finite()) {
            bail!("起始與結束時間必須是有限數值");
        }
        if !(0.0..=1.0).contains(&detector.min_change) {
            bail!("場景變換閾值必須介於 0 到 1: {}", detector.min_change);
        }
        if detector.from_time < 0.0 {
            bail!("起始時間不可為負數: {}", detector.from_time);
        }
        if let Some(to_time) = detector.to_time.filter(|t| *t <= detector.from_time) {
            bail!("結束時間必須大於起始時間: {to_time}");
        }
        Ok(())
    }

    fn process_file(
        detector: &SceneDetector,
        file: &Path,
        out_dir: &Path,
        detector_config: &SceneDetectorConfig,
    ) -> Result<usize> {
        println!("{} {}", style("處理中:").dim(), file.display());

        let segments = detector.detect(file, detector_config, |segment| {
            println!(
                "  場景: {:.2}s - {:.2}s",
                segment.start, segment.end
            );
        });
        println!("  偵測到 {} 個片段", style(segments.len()).green());

        let media_file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let cut_list_path = out_dir.join(cut_list_file_name(file));

        CutList::from_segments(&segments, &media_file_name).write_to(&cut_list_path)?;
        println!(
            "  {} {}\n",
            style("已儲存:").green(),
            cut_list_path.display()
        );

        Ok(segments.len())
    }

    fn print_summary(summary: &SceneCutterSummary) {
        println!("{}", style("=== 場景偵測結果 ===").cyan().bold());
        println!("  處理檔案: {} 個", style(summary.files_processed).green());
        println!("  輸出片段: {} 個", summary.segments_written);
        if summary.errors > 0 {
            println!("  失敗: {} 個", style(summary.errors).red());
        }

        info!(
            "場景偵測完成 - 檔案: {}, 片段: {}, 失敗: {}",
            summary.files_processed, summary.segments_written, summary.errors
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(min_change: f64, from_time: f64, to_time: Option<f64>) -> SceneCutterOptions {
        SceneCutterOptions {
            files_dir: PathBuf::from("."),
            out_dir: None,
            detector: SceneDetectorConfig {
                min_change,
                stream: None,
                from_time,
                to_time,
            },
        }
    }

    #[test]
    fn test_validate_options() {
        assert!(SceneCutter::validate_options(&options(0.3, 0.0, None)).is_ok());
        assert!(SceneCutter::validate_options(&options(1.5, 0.0, None)).is_err());
        assert!(SceneCutter::validate_options(&options(0.3, -1.0, None)).is_err());
        assert!(SceneCutter::validate_options(&options(0.3, 20.0, Some(10.0))).is_err());
        assert!(SceneCutter::validate_options(&options(0.3, 5.0, Some(10.0))).is_ok());
    }

    #[test]
    fn test_validate_options_rejects_non_finite_times() {
        assert!(SceneCutter::validate_options(&options(0.3, f64::NAN, None)).is_err());
        assert!(SceneCutter::validate_options(&options(0.3, f64::INFINITY, None)).is_err());
        assert!(SceneCutter::validate_options(&options(0.3, 0.0, Some(f64::NAN))).is_err());
        assert!(SceneCutter::validate_options(&options(0.3, 0.0, Some(f64::INFINITY))).is_err());
        assert!(SceneCutter::validate_options(&options(f64::NAN, 0.0, None)).is_err());
    }
}
