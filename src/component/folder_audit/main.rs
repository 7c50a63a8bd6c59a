use crate::tools::{has_extension, validate_directory_exists};
use anyhow::Result;
use console::style;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 找出沒有任何指定副檔名檔案的子資料夾（遞迴，不含根目錄本身）
pub fn find_folders_without_extension(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    validate_directory_exists(root)?;

    let mut folders: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("無法讀取: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| !folder_has_extension(entry.path(), extension))
        .map(walkdir::DirEntry::into_path)
        .collect();

    folders.sort();
    Ok(folders)
}

fn folder_has_extension(folder: &Path, extension: &str) -> bool {
    let Ok(entries) = fs::read_dir(folder) else {
        warn!("無法讀取資料夾: {}", folder.display());
        return false;
    };

    entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .any(|path| path.is_file() && has_extension(&path, extension))
}

/// 列出指定深度內（0 = 只有目前資料夾）的指定副檔名檔案，依字母排序
pub fn list_files_with_extension(
    directory: &Path,
    extension: &str,
    hide_extension: bool,
    max_depth: usize,
) -> Result<Vec<String>> {
    validate_directory_exists(directory)?;

    let mut files: Vec<String> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(max_depth + 1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("無法讀取: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), extension))
        .filter_map(|entry| {
            let name = if hide_extension {
                entry.path().file_stem()?
            } else {
                entry.path().file_name()?
            };
            Some(name.to_string_lossy().into_owned())
        })
        .collect();

    files.sort();
    Ok(files)
}

/// 資料夾稽核元件：輸出稽核結果
pub struct FolderAuditor;

impl FolderAuditor {
    pub fn report_folders_without_extension(
        root: &Path,
        extension: &str,
        verbose: bool,
    ) -> Result<Vec<PathBuf>> {
        let folders = find_folders_without_extension(root, extension)?;

        if folders.is_empty() {
            println!(
                "{}",
                style(format!("所有子資料夾都含有 '{extension}' 檔案")).green()
            );
        } else {
            println!("沒有 '{extension}' 檔案的子資料夾:");
            for folder in &folders {
                println!("{}", folder.display());
            }
            if verbose {
                println!("\n總計: {} 個資料夾", style(folders.len()).yellow());
            }
        }

        Ok(folders)
    }

    pub fn report_files_with_extension(
        directory: &Path,
        extension: &str,
        hide_extension: bool,
        max_depth: usize,
    ) -> Result<Vec<String>> {
        let files = list_files_with_extension(directory, extension, hide_extension, max_depth)?;
        for file in &files {
            println!("{file}");
        }
        Ok(files)
    }
}
