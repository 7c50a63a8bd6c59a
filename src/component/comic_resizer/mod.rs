//! 漫畫壓縮檔縮圖元件
//!
//! 解壓縮 CBZ/CBR、將圖片短邊縮小到上限後重新打包成 `<名稱>.rsz.cbz`

mod image_resize;
mod main;

pub use image_resize::{ImageResize, resize_image_in_place, scaled_dimensions};
pub use main::{
    ComicResizer, ComicResizerOptions, ComicResizerSummary, ResizeReport, resized_output_path,
};
