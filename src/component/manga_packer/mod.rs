//! 漫畫章節資料夾轉 CBZ 元件

mod main;

pub use main::{MangaPacker, MangaPackerOptions, PackResult, chapter_archive_path};
