//! 漫畫壓縮檔（CBZ/CBR）的讀寫工具

use crate::tools::file_scanner::has_extension;
use anyhow::{Context, Result, bail};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// 解壓縮 CBZ（zip）或 CBR（rar）到指定資料夾
pub fn extract_comic_archive(archive_path: &Path, destination: &Path) -> Result<()> {
    if has_extension(archive_path, "cbz") {
        extract_zip(archive_path, destination)
    } else if has_extension(archive_path, "cbr") {
        extract_rar(archive_path, destination)
    } else {
        bail!("不支援的檔案格式: {}", archive_path.display())
    }
}

fn extract_zip(archive_path: &Path, destination: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("無法開啟壓縮檔: {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("無法讀取 zip 內容: {}", archive_path.display()))?;
    archive
        .extract(destination)
        .with_context(|| format!("解壓縮失敗: {}", archive_path.display()))?;
    Ok(())
}

fn extract_rar(archive_path: &Path, destination: &Path) -> Result<()> {
    let mut archive = unrar::Archive::new(archive_path)
        .open_for_processing()
        .with_context(|| format!("無法開啟 rar 壓縮檔: {}", archive_path.display()))?;

    while let Some(header) = archive.read_header()? {
        archive = if header.entry().is_file() {
            header.extract_with_base(destination)?
        } else {
            header.skip()?
        };
    }

    Ok(())
}

/// 將資料夾內所有檔案（保留相對路徑）壓縮成 zip，回傳寫入的檔案數
pub fn zip_directory(source_dir: &Path, output_file: &Path) -> Result<usize> {
    let entries: Vec<(PathBuf, String)> = WalkDir::new(source_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = archive_name(entry.path().strip_prefix(source_dir).ok()?);
            Some((entry.into_path(), name))
        })
        .collect();

    write_zip(&entries, output_file)
}

/// 將檔案以平面結構（只保留檔名）壓縮成 zip，依傳入順序寫入
pub fn zip_files_flat(files: &[PathBuf], output_file: &Path) -> Result<usize> {
    let entries: Vec<(PathBuf, String)> = files
        .iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some((path.clone(), name))
        })
        .collect();

    write_zip(&entries, output_file)
}

fn write_zip(entries: &[(PathBuf, String)], output_file: &Path) -> Result<usize> {
    let file = File::create(output_file)
        .with_context(|| format!("無法建立壓縮檔: {}", output_file.display()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, name) in entries {
        writer.start_file(name.as_str(), options)?;
        let mut source =
            File::open(path).with_context(|| format!("無法讀取檔案: {}", path.display()))?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish()?;
    Ok(entries.len())
}

/// zip 內的路徑一律使用 `/` 分隔
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// 檔案大小（MB）
pub fn file_size_mb(path: &Path) -> Result<f64> {
    let size = fs::metadata(path)
        .with_context(|| format!("無法取得檔案大小: {}", path.display()))?
        .len();
    Ok(size as f64 / (1024.0 * 1024.0))
}
