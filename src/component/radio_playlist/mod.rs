//! 電台播放清單元件
//!
//! 下載（或讀取快取的）電台目錄，依類型輸出 m3u 播放清單

mod main;
mod playlist;

pub use main::{
    CACHE_FILE_NAME, RadioPlaylistGenerator, RadioPlaylistOptions, RadioPlaylistResult,
    fetch_radios, parse_stations,
};
pub use playlist::{RadioStation, StylePlaylist, group_by_style, normalize_style_name, style_name};
