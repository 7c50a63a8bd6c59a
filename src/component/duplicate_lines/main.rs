use crate::tools::validate_file_exists;
use anyhow::{Context, Result};
use console::style;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLine {
    pub line: String,
    pub count: usize,
}

/// 找出重複的行（區分大小寫，去除前後空白，忽略空行），依首次出現順序
#[must_use]
pub fn find_duplicate_lines(content: &str) -> Vec<DuplicateLine> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let count = counts.entry(line).or_insert(0);
        if *count == 0 {
            order.push(line);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|line| {
            let count = counts[line];
            (count > 1).then(|| DuplicateLine {
                line: line.to_string(),
                count,
            })
        })
        .collect()
}

/// 重複行檢查元件
pub struct DuplicateLineFinder;

impl DuplicateLineFinder {
    pub fn run(path: &Path) -> Result<Vec<DuplicateLine>> {
        validate_file_exists(path)?;
        let content = fs::read_to_string(path)
            .with_context(|| format!("無法讀取檔案: {}", path.display()))?;

        let duplicates = find_duplicate_lines(&content);

        if duplicates.is_empty() {
            println!("{}", style("沒有重複的行").green());
        } else {
            println!("\n{}", style("找到重複的行:").yellow());
            println!("{}", "-".repeat(40));
            for duplicate in &duplicates {
                println!("'{}' - 出現 {} 次", duplicate.line, duplicate.count);
            }
        }

        Ok(duplicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_duplicate_lines_order_and_counts() {
        let content = "beta\nalpha\n  beta  \n\nALPHA\nalpha\nbeta\n\n\n";
        let duplicates = find_duplicate_lines(content);
        assert_eq!(
            duplicates,
            vec![
                DuplicateLine {
                    line: "beta".to_string(),
                    count: 3
                },
                DuplicateLine {
                    line: "alpha".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_no_duplicates() {
        assert!(find_duplicate_lines("one\ntwo\nthree").is_empty());
        assert!(find_duplicate_lines("").is_empty());
    }

    #[test]
    fn test_run_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(DuplicateLineFinder::run(&temp_dir.path().join("missing.txt")).is_err());
    }
}
