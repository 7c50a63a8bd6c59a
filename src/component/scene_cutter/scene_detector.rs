use super::segment::{Segment, SegmentBuilder};
use crate::tools::probe_duration;
use log::{debug, error, warn};
use regex::Regex;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

/// `metadata=print` 每個被選中的畫格輸出的第一行
static REGEX_FRAME_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^frame:\d+\s+pts:-?\d+\s+pts_time:([\d.]+)").expect("Invalid regex")
});

/// 場景偵測設定
#[derive(Debug, Clone)]
pub struct SceneDetectorConfig {
    /// 場景變換閾值 (0-1)，越高越不敏感
    pub min_change: f64,
    /// 指定串流索引，`None` 表示第一個視訊串流
    pub stream: Option<u32>,
    /// 範圍起點（秒），0 表示從頭開始
    pub from_time: f64,
    /// 範圍終點（秒），`None` 表示到影片結尾
    pub to_time: Option<f64>,
}

impl Default for SceneDetectorConfig {
    fn default() -> Self {
        Self {
            min_change: 0.3,
            stream: None,
            from_time: 0.0,
            to_time: None,
        }
    }
}

/// 使用 ffmpeg `select='gt(scene,N)'` 濾鏡串流偵測場景變換
pub struct SceneDetector {
    ffmpeg: String,
    ffprobe: String,
}

impl SceneDetector {
    #[must_use]
    pub fn new(ffmpeg: &str, ffprobe: &str) -> Self {
        Self {
            ffmpeg: ffmpeg.to_string(),
            ffprobe: ffprobe.to_string(),
        }
    }

    #[must_use]
    pub fn build_command(&self, path: &Path, config: &SceneDetectorConfig) -> Command {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-nostdin"]);

        if config.from_time > 0.0 {
            cmd.args(["-ss", &config.from_time.to_string()]);
        }
        if let Some(to_time) = config.to_time.filter(|t| *t > 0.0) {
            cmd.args(["-to", &to_time.to_string()]);
        }
        cmd.arg("-i").arg(path);

        let stream_map = config
            .stream
            .map_or_else(|| "0:v:0".to_string(), |id| format!("0:{id}"));
        let filter = format!(
            "select='gt(scene,{})',metadata=print:file=-:direct=1",
            config.min_change
        );

        cmd.args(["-map", &stream_map, "-filter:v", &filter, "-f", "null", "-"]);
        cmd
    }

    /// 偵測場景並回傳片段；每產生一個片段就呼叫 `on_segment`
    ///
    /// 外部程式或長度偵測失敗只記錄警告，永遠回傳目前已觀察到的片段。
    pub fn detect<F>(
        &self,
        path: &Path,
        config: &SceneDetectorConfig,
        mut on_segment: F,
    ) -> Vec<Segment>
    where
        F: FnMut(&Segment),
    {
        let mut builder = SegmentBuilder::new(config.from_time);

        let mut command = self.build_command(path, config);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        debug!("執行場景偵測: {command:?}");

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!("無法啟動 ffmpeg ({}): {e}", self.ffmpeg);
                return builder.into_segments();
            }
        };

        if let Some(stdout) = child.stdout.take() {
            let result = read_boundaries(BufReader::new(stdout), |pts_time| {
                if let Some(segment) = builder.push_boundary(config.from_time + pts_time) {
                    on_segment(&segment);
                }
            });
            if let Err(e) = result {
                warn!("讀取 ffmpeg 輸出中斷: {e}");
            }
        }

        match child.wait() {
            Ok(status) if !status.success() => {
                warn!("ffmpeg 結束狀態異常 ({status}): {}", path.display());
            }
            Err(e) => warn!("無法等待 ffmpeg 結束: {e}"),
            Ok(_) => {}
        }

        let end = self.timeline_end(path, config);
        if let Some(segment) = builder.close(end) {
            on_segment(&segment);
        }

        builder.into_segments()
    }

    /// 時間軸終點：明確指定的範圍終點，否則重新偵測影片長度（失敗時為 0）
    fn timeline_end(&self, path: &Path, config: &SceneDetectorConfig) -> f64 {
        if let Some(to_time) = config.to_time.filter(|t| *t > 0.0) {
            return to_time;
        }

        match probe_duration(&self.ffprobe, path) {
            Ok(duration) => duration,
            Err(e) => {
                warn!("無法取得影片長度 {}: {e:#}", path.display());
                0.0
            }
        }
    }
}

/// 解析一行輸出中的 `pts_time`
#[must_use]
pub fn parse_pts_time(line: &str) -> Option<f64> {
    REGEX_FRAME_LINE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// 逐行讀取輸出，對每個場景邊界（相對時間）呼叫 `on_boundary`，回傳邊界數量
pub fn read_boundaries<R, F>(mut reader: R, mut on_boundary: F) -> io::Result<usize>
where
    R: BufRead,
    F: FnMut(f64),
{
    let mut buffer = Vec::new();
    let mut count = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        if let Some(pts_time) = parse_pts_time(&line) {
            debug!("場景邊界: {pts_time}");
            on_boundary(pts_time);
            count += 1;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn command_args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_parse_pts_time() {
        assert_eq!(
            parse_pts_time("frame:12   pts:6006    pts_time:6.006"),
            Some(6.006)
        );
        assert_eq!(parse_pts_time("frame:0 pts:-3 pts_time:0.5\n"), Some(0.5));
    }

    #[test]
    fn test_parse_pts_time_ignores_other_lines() {
        assert_eq!(parse_pts_time("lavfi.scene_score=0.512345"), None);
        assert_eq!(parse_pts_time("frame:1 pts:10 pts_time:1.2.3"), None);
        assert_eq!(parse_pts_time(""), None);
    }

    #[test]
    fn test_read_boundaries_streams_lines() {
        let output = "\
frame:0    pts:1001    pts_time:1.001
lavfi.scene_score=0.420000
frame:1    pts:5005    pts_time:5.005
lavfi.scene_score=0.910000
garbage line
frame:2    pts:9009    pts_time:9.009
";
        let mut boundaries = Vec::new();
        let count = read_boundaries(Cursor::new(output), |t| boundaries.push(t)).unwrap();
        assert_eq!(count, 3);
        assert_eq!(boundaries, vec![1.001, 5.005, 9.009]);
    }

    #[test]
    fn test_read_boundaries_tolerates_invalid_utf8() {
        let mut output = b"frame:0 pts:1 pts_time:2.5\n".to_vec();
        output.extend_from_slice(&[0xff, 0xfe, b'\n']);
        output.extend_from_slice(b"frame:1 pts:2 pts_time:4.0");

        let mut boundaries = Vec::new();
        read_boundaries(Cursor::new(output), |t| boundaries.push(t)).unwrap();
        assert_eq!(boundaries, vec![2.5, 4.0]);
    }

    #[test]
    fn test_build_command_defaults() {
        let detector = SceneDetector::new("ffmpeg", "ffprobe");
        let cmd = detector.build_command(Path::new("/v/a.mp4"), &SceneDetectorConfig::default());
        let args = command_args(&cmd);

        assert_eq!(cmd.get_program(), "ffmpeg");
        assert!(!args.contains(&"-ss".to_string()));
        assert!(!args.contains(&"-to".to_string()));
        assert!(args.contains(&"0:v:0".to_string()));
        assert!(args.contains(&"select='gt(scene,0.3)',metadata=print:file=-:direct=1".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("-"));
    }

    #[test]
    fn test_build_command_with_range_and_stream() {
        let detector = SceneDetector::new("ffmpeg", "ffprobe");
        let config = SceneDetectorConfig {
            min_change: 0.45,
            stream: Some(2),
            from_time: 30.0,
            to_time: Some(90.5),
        };
        let args = command_args(&detector.build_command(Path::new("a.mkv"), &config));

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let to = args.iter().position(|a| a == "-to").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[ss + 1], "30");
        assert_eq!(args[to + 1], "90.5");
        assert!(ss < input && to < input);
        assert!(args.contains(&"0:2".to_string()));
    }

    #[test]
    fn test_detect_missing_ffmpeg_returns_empty() {
        let detector = SceneDetector::new("definitely-not-ffmpeg", "definitely-not-ffprobe");
        let mut seen = 0;
        let segments = detector.detect(
            Path::new("missing.mp4"),
            &SceneDetectorConfig::default(),
            |_| seen += 1,
        );
        assert!(segments.is_empty());
        assert_eq!(seen, 0);
    }
}
