use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 比較副檔名（不分大小寫，允許前導點）
#[must_use]
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// 遞迴掃描目錄，回傳符合條件的檔案（依路徑排序）
pub fn scan_files_recursive<F>(directory: &Path, filter: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| filter(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.sort();
    files
}

/// 只列出目錄第一層的檔案（不含子資料夾）
pub fn list_direct_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(directory).with_context(|| format!("無法讀取資料夾: {}", directory.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// 只列出目錄第一層的子資料夾
pub fn list_direct_subdirectories(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let entries =
        fs::read_dir(directory).with_context(|| format!("無法讀取資料夾: {}", directory.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}
