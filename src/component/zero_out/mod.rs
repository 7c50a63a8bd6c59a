//! 清空影片檔案元件

mod main;

pub use main::{ZeroOut, ZeroOutOptions, ZeroOutResult};
