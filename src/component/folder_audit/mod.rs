//! 資料夾稽核元件
//!
//! 找出缺少特定副檔名檔案的子資料夾、列出指定副檔名的檔案

mod main;

pub use main::{FolderAuditor, find_folders_without_extension, list_files_with_extension};
