//! 文字檔重複行檢查元件

mod main;

pub use main::{DuplicateLine, DuplicateLineFinder, find_duplicate_lines};
