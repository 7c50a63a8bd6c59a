//! LosslessCut 專案檔（`.llc`）匯出

use super::segment::Segment;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CUT_LIST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutSegment {
    pub start: f64,
    pub end: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutList {
    pub version: u32,
    pub media_file_name: String,
    pub cut_segments: Vec<CutSegment>,
}

impl CutList {
    #[must_use]
    pub fn from_segments(segments: &[Segment], media_file_name: &str) -> Self {
        Self {
            version: CUT_LIST_VERSION,
            media_file_name: media_file_name.to_string(),
            cut_segments: segments
                .iter()
                .map(|s| CutSegment {
                    start: s.start,
                    end: s.end,
                    name: String::new(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("無法序列化剪輯清單")
    }

    /// 寫入檔案（一律覆寫）
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("無法寫入剪輯清單: {}", path.display()))
    }
}

/// `movie.mp4` -> `movie-proj.llc`
#[must_use]
pub fn cut_list_file_name(media_path: &Path) -> String {
    let stem = media_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}-proj.llc")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_segments() -> Vec<Segment> {
        vec![
            Segment {
                start: 0.0,
                end: 3.25,
            },
            Segment {
                start: 3.25,
                end: 10.5,
            },
        ]
    }

    #[test]
    fn test_json_layout() {
        let json = CutList::from_segments(&sample_segments(), "clip.mp4")
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["mediaFileName"], "clip.mp4");
        assert_eq!(value["cutSegments"][1]["start"], 3.25);
        assert_eq!(value["cutSegments"][1]["end"], 10.5);
        assert_eq!(value["cutSegments"][0]["name"], "");
        assert!(json.contains("\n  \"version\""));
    }

    #[test]
    fn test_written_file_decodes_to_same_pairs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clip-proj.llc");
        let segments = sample_segments();

        fs::write(&path, "stale").unwrap();
        CutList::from_segments(&segments, "clip.mp4")
            .write_to(&path)
            .unwrap();

        let decoded: CutList = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let pairs: Vec<(f64, f64)> = decoded
            .cut_segments
            .iter()
            .map(|s| (s.start, s.end))
            .collect();
        assert_eq!(pairs, vec![(0.0, 3.25), (3.25, 10.5)]);
        assert!(decoded.cut_segments.iter().all(|s| s.name.is_empty()));
    }

    #[test]
    fn test_cut_list_file_name() {
        assert_eq!(
            cut_list_file_name(Path::new("/videos/My Clip.final.mp4")),
            "My Clip.final-proj.llc"
        );
    }
}
