use super::database::{CatalogDatabase, InsertOutcome};
use super::filename_parser::{extract_ids, parse_catalog_filename};
use crate::tools::validate_file_exists;
use anyhow::{Context, Result, bail};
use console::style;
use log::{info, warn};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 清單匯入結果統計
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub total: usize,
    pub inserted: usize,
    pub already_present: usize,
    pub errors: usize,
}

/// 評分參數：`clear`/`none` 代表清除，其餘必須是數字
pub fn parse_rating_arg(value: &str) -> Result<Option<u8>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("clear") || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match value.parse::<u8>() {
        Ok(rating) => Ok(Some(rating)),
        Err(_) => bail!("無效的評分: {value}（請輸入 1-10 或 clear）"),
    }
}

/// 影片目錄資料庫元件
pub struct CatalogManager {
    shutdown_signal: Arc<AtomicBool>,
}

impl CatalogManager {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    /// 讀取檔名清單（每行一個 `[ID] 說明.mp4`）並寫入資料庫
    pub fn import_list(&self, db_path: &Path, list_path: &Path) -> Result<ImportSummary> {
        println!("{}", style("=== 匯入影片清單 ===").cyan().bold());

        validate_file_exists(list_path)?;
        let content = fs::read_to_string(list_path)
            .with_context(|| format!("無法讀取清單: {}", list_path.display()))?;
        let db = CatalogDatabase::open(db_path)?;

        let lines: Vec<&str> = content.trim().lines().collect();
        let mut summary = ImportSummary {
            total: lines.len(),
            ..ImportSummary::default()
        };

        for (i, line) in lines.iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止匯入");
                break;
            }

            let prefix = format!("[{i:05}]");
            let entry = match parse_catalog_filename(line) {
                Ok(entry) => entry,
                Err(e) => {
                    summary.errors += 1;
                    println!("{prefix} {} {e}", style("錯誤:").red());
                    continue;
                }
            };

            match db.insert_item(&entry.id, &entry.description) {
                Ok(InsertOutcome::Inserted) => {
                    summary.inserted += 1;
                    println!("{prefix} {} 已新增", entry.id);
                }
                Ok(InsertOutcome::AlreadyExists) => {
                    summary.already_present += 1;
                    println!("{prefix} {} {}", entry.id, style("已存在，略過").yellow());
                }
                Err(e) => {
                    summary.errors += 1;
                    println!("{prefix} {} {} {e:#}", entry.id, style("無法新增:").red());
                }
            }
        }

        println!(
            "完成，已新增 {} / {} 筆",
            style(summary.inserted).green(),
            summary.total
        );
        info!(
            "清單匯入完成 - 新增: {}, 已存在: {}, 失敗: {}",
            summary.inserted, summary.already_present, summary.errors
        );

        Ok(summary)
    }

    pub fn rate(&self, db_path: &Path, id: &str, rating: Option<u8>) -> Result<bool> {
        let db = CatalogDatabase::open(db_path)?;
        let found = db.update_rating(id, rating)?;
        Self::print_update_result(id, found, "評分");
        Ok(found)
    }

    pub fn comment(&self, db_path: &Path, id: &str, comment: Option<&str>) -> Result<bool> {
        let db = CatalogDatabase::open(db_path)?;
        let found = db.update_comment(id, comment)?;
        Self::print_update_result(id, found, "備註");
        Ok(found)
    }

    /// 從文字檔列出每行開頭的 ID
    pub fn list_ids(&self, text_path: &Path) -> Result<Vec<String>> {
        validate_file_exists(text_path)?;
        let content = fs::read_to_string(text_path)
            .with_context(|| format!("無法讀取檔案: {}", text_path.display()))?;

        let ids = extract_ids(&content);
        for id in &ids {
            println!("{id}");
        }
        Ok(ids)
    }

    fn print_update_result(id: &str, found: bool, field: &str) {
        if found {
            println!("{} {id} 的{field}已更新", style("✓").green());
        } else {
            println!("{} 找不到 ID '{id}'，{field}未更新", style("!").yellow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_rating_arg() {
        assert_eq!(parse_rating_arg("7").unwrap(), Some(7));
        assert_eq!(parse_rating_arg("clear").unwrap(), None);
        assert_eq!(parse_rating_arg("NONE").unwrap(), None);
        assert_eq!(parse_rating_arg("42").unwrap(), Some(42));
        assert!(parse_rating_arg("-1").is_err());
        assert!(parse_rating_arg("great").is_err());
    }

    #[test]
    fn test_import_list() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("catalog.db");
        let list_path = temp_dir.path().join("list.txt");
        fs::write(
            &list_path,
            "[ABC-001] First.mp4\nno id here.mp4\n[ABC-002] [Warning] Second.mp4\n[ABC-001] Again.mp4\n",
        )
        .unwrap();

        let manager = CatalogManager::new(Arc::new(AtomicBool::new(false)));
        let summary = manager.import_list(&db_path, &list_path).unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.errors, 1);

        let db = CatalogDatabase::open(&db_path).unwrap();
        let item = db.get_item("ABC-002").unwrap().unwrap();
        assert_eq!(item.description, "[Warning] Second");
        assert_eq!(db.get_item("ABC-001").unwrap().unwrap().description, "First");

        assert!(manager.rate(&db_path, "ABC-001", Some(9)).unwrap());
        assert!(manager.rate(&db_path, "ABC-001", Some(12)).is_err());
        assert!(!manager.comment(&db_path, "XYZ-999", Some("n/a")).unwrap());
    }
}
