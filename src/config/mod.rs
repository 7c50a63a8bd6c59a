pub mod load;
pub mod save;
pub mod types;

pub use types::{
    ComicResizerSettings, Config, DEFAULT_RADIO_CATALOG_URL, FileTypeTable, MAX_RECENT_PATHS,
    RadioSettings, SceneCutterSettings, UserSettings, ZeroOutSettings,
};
