use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 路徑歷史保留的最大數量
pub const MAX_RECENT_PATHS: usize = 10;

/// 預設的電台清單來源
pub const DEFAULT_RADIO_CATALOG_URL: &str =
    "https://github.com/drocheam/caprice/raw/refs/heads/main/radios.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
    #[serde(rename = "IMAGE_FILE")]
    pub image_file: Vec<String>,
    #[serde(rename = "COMIC_ARCHIVE_FILE")]
    pub comic_archive_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        Self::matches(&self.video_file, path)
    }

    #[must_use]
    pub fn is_image_file(&self, path: &Path) -> bool {
        Self::matches(&self.image_file, path)
    }

    #[must_use]
    pub fn is_comic_archive(&self, path: &Path) -> bool {
        Self::matches(&self.comic_archive_file, path)
    }

    fn to_set(extensions: &[String]) -> HashSet<String> {
        extensions.iter().map(|ext| ext.to_lowercase()).collect()
    }

    fn matches(extensions: &[String], path: &Path) -> bool {
        let set = Self::to_set(extensions);
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| set.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 場景切割設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneCutterSettings {
    /// 場景變換閾值 (0-1)，越高越不敏感
    pub min_change: f64,
    /// 要處理的影片副檔名（不含前導點）
    pub media_extension: String,
}

impl Default for SceneCutterSettings {
    fn default() -> Self {
        Self {
            min_change: 0.3,
            media_extension: "mp4".to_string(),
        }
    }
}

/// 漫畫壓縮設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComicResizerSettings {
    /// 圖片短邊的最大像素
    pub max_dimension: u32,
    pub keep_original: bool,
}

impl Default for ComicResizerSettings {
    fn default() -> Self {
        Self {
            max_dimension: 720,
            keep_original: false,
        }
    }
}

/// 電台播放清單設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioSettings {
    pub catalog_url: String,
    pub out_dir: String,
}

impl Default for RadioSettings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_RADIO_CATALOG_URL.to_string(),
            out_dir: "out".to_string(),
        }
    }
}

/// 清空檔案設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeroOutSettings {
    pub retry_delay_secs: u64,
    /// `None` 表示無限重試
    pub max_attempts: Option<u32>,
}

impl Default for ZeroOutSettings {
    fn default() -> Self {
        Self {
            retry_delay_secs: 5,
            max_attempts: None,
        }
    }
}

/// 使用者設定（儲存於 settings.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub catalog_db_path: String,
    pub scene_cutter: SceneCutterSettings,
    pub comic_resizer: ComicResizerSettings,
    pub radio: RadioSettings,
    pub zero_out: ZeroOutSettings,
    pub recent_paths: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            catalog_db_path: "database.db".to_string(),
            scene_cutter: SceneCutterSettings::default(),
            comic_resizer: ComicResizerSettings::default(),
            radio: RadioSettings::default(),
            zero_out: ZeroOutSettings::default(),
            recent_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: UserSettings,
}
