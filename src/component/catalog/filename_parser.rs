//! 檔名解析模組
//!
//! 從 `[ID-123] 說明.mp4` 形式的檔名取出 ID 與說明

use anyhow::{Result, anyhow};
use regex::Regex;
use std::sync::LazyLock;

/// 第一個中括號內為 ID；說明保留其後所有內容（包含其他中括號）
static REGEX_CATALOG_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\s*(.*?)\s*(?i:\.(?:mp4|mkv|avi|wmv|mov|m4v|ts|webm))?$")
        .expect("Invalid regex")
});

/// 每行開頭的 ID（中括號可省略）
static REGEX_LINE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\[?(\w+-\d+)\]?").expect("Invalid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub description: String,
}

/// 解析單一檔名
pub fn parse_catalog_filename(filename: &str) -> Result<CatalogEntry> {
    let trimmed = filename.trim();
    let caps = REGEX_CATALOG_FILENAME
        .captures(trimmed)
        .ok_or_else(|| anyhow!("檔名格式不符 '[ID] 說明': {trimmed}"))?;

    Ok(CatalogEntry {
        id: caps[1].trim().to_string(),
        description: caps[2].to_string(),
    })
}

/// 從文字中取出每行開頭的 ID，保持出現順序
#[must_use]
pub fn extract_ids(text: &str) -> Vec<String> {
    REGEX_LINE_ID
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}
