use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

/// 使用 ffprobe 取得影片總長度（秒）
pub fn probe_duration(ffprobe: &str, path: &Path) -> Result<f64> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_entries",
            "format=duration",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    parse_duration_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_duration_output(stdout: &str) -> Result<f64> {
    let probe: FfprobeOutput =
        serde_json::from_str(stdout).with_context(|| "無法解析 ffprobe 輸出")?;

    let duration = probe
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| anyhow::anyhow!("ffprobe 輸出缺少影片長度"))?;

    let seconds: f64 = duration
        .trim()
        .parse()
        .with_context(|| format!("無法解析影片長度: {duration}"))?;

    if !seconds.is_finite() || seconds < 0.0 {
        bail!("影片長度無效: {seconds}");
    }

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_output() {
        let json = r#"{ "format": { "duration": "125.480000" } }"#;
        assert!((parse_duration_output(json).unwrap() - 125.48).abs() < 1e-9);
    }

    #[test]
    fn test_parse_duration_output_missing_field() {
        assert!(parse_duration_output(r#"{ "format": {} }"#).is_err());
        assert!(parse_duration_output("{}").is_err());
    }

    #[test]
    fn test_parse_duration_output_not_a_number() {
        let json = r#"{ "format": { "duration": "N/A" } }"#;
        assert!(parse_duration_output(json).is_err());
    }

    #[test]
    fn test_probe_duration_missing_binary() {
        let result = probe_duration("definitely-not-an-ffprobe-binary", Path::new("x.mp4"));
        assert!(result.is_err());
    }
}
