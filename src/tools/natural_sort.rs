//! 自然排序（讓 `2.jpg` 排在 `10.jpg` 前面）

use std::cmp::Ordering;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Number(u128),
    Text(String),
}

fn natural_key(name: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in name.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            chunks.push(make_chunk(&current, in_digits));
            current.clear();
        }
        in_digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(make_chunk(&current, in_digits));
    }

    chunks
}

fn make_chunk(text: &str, digits: bool) -> Chunk {
    if digits {
        // 超過 u128 的數字串退回文字比較
        if let Ok(n) = text.parse::<u128>() {
            return Chunk::Number(n);
        }
    }
    Chunk::Text(text.to_lowercase())
}

#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// 依檔名自然排序路徑
pub fn sort_paths_naturally(paths: &mut [std::path::PathBuf]) {
    paths.sort_by(|a, b| natural_cmp(&file_name_of(a), &file_name_of(b)));
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
