use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDateTime;
use log::{info, warn};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::ops::RangeInclusive;
use std::path::Path;

pub const RATING_RANGE: RangeInclusive<u8> = 1..=10;

/// SQLite `CURRENT_TIMESTAMP` 格式
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS items (
    id TEXT NOT NULL PRIMARY KEY,
    description TEXT NOT NULL,
    rating INTEGER CHECK (rating >= 1 AND rating <= 10),
    comment TEXT,
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TRIGGER IF NOT EXISTS update_timestamp
AFTER UPDATE ON items
FOR EACH ROW
WHEN OLD.rating IS NOT NEW.rating OR OLD.comment IS NOT NEW.comment
BEGIN
    UPDATE items SET timestamp = CURRENT_TIMESTAMP WHERE id = NEW.id;
END;
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub description: String,
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// 單一資料表 `items` 的 SQLite 包裝
pub struct CatalogDatabase {
    conn: Connection,
}

fn row_to_item(row: &Row) -> Result<CatalogItem> {
    let timestamp: String = row.get("timestamp")?;

    Ok(CatalogItem {
        id: row.get("id")?,
        description: row.get("description")?,
        rating: row.get("rating")?,
        comment: row.get("comment")?,
        timestamp: NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
            .map_err(|err| anyhow!("invalid timestamp '{timestamp}': {err}"))?,
    })
}

impl CatalogDatabase {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("無法開啟資料庫: {}", path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).context("無法建立資料表")?;
        Ok(Self { conn })
    }

    /// 新增一筆資料；ID 已存在時不做任何變更
    pub fn insert_item(&self, id: &str, description: &str) -> Result<InsertOutcome> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO items (id, description) VALUES (?1, ?2)",
            params![id, description],
        )?;

        if changed == 0 {
            warn!("ID '{id}' 已存在，未做任何變更");
            return Ok(InsertOutcome::AlreadyExists);
        }
        Ok(InsertOutcome::Inserted)
    }

    /// 更新評分；`None` 代表清除評分。回傳是否找到該 ID
    pub fn update_rating(&self, id: &str, rating: Option<u8>) -> Result<bool> {
        if let Some(value) = rating.filter(|r| !RATING_RANGE.contains(r)) {
            bail!(
                "評分必須介於 {} 到 {} 之間或清除: {value}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            );
        }

        let changed = self.conn.execute(
            "UPDATE items SET rating = ?1 WHERE id = ?2",
            params![rating, id],
        )?;
        Ok(Self::report_update(id, changed, "評分"))
    }

    /// 更新備註；`None` 代表清除備註。回傳是否找到該 ID
    pub fn update_comment(&self, id: &str, comment: Option<&str>) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE items SET comment = ?1 WHERE id = ?2",
            params![comment, id],
        )?;
        Ok(Self::report_update(id, changed, "備註"))
    }

    fn report_update(id: &str, changed: usize, field: &str) -> bool {
        if changed == 0 {
            warn!("找不到 ID '{id}'，{field}未更新");
            false
        } else {
            info!("已更新 ID '{id}' 的{field}");
            true
        }
    }

    pub fn get_item(&self, id: &str) -> Result<Option<CatalogItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, rating, comment, timestamp FROM items WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_item(row)?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<usize> {
        let count: Option<i64> = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .optional()?;
        Ok(usize::try_from(count.unwrap_or(0))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_item() -> CatalogDatabase {
        let db = CatalogDatabase::open_in_memory().unwrap();
        assert_eq!(
            db.insert_item("ABC-001", "First title").unwrap(),
            InsertOutcome::Inserted
        );
        db
    }

    fn backdate(db: &CatalogDatabase, id: &str) {
        db.conn
            .execute(
                "UPDATE items SET timestamp = '2000-01-01 00:00:00' WHERE id = ?1",
                params![id],
            )
            .unwrap();
    }

    #[test]
    fn test_insert_and_get() {
        let db = db_with_item();
        let item = db.get_item("ABC-001").unwrap().unwrap();
        assert_eq!(item.description, "First title");
        assert_eq!(item.rating, None);
        assert_eq!(item.comment, None);
        assert!(db.get_item("missing").unwrap().is_none());
        assert_eq!(db.count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let db = db_with_item();
        backdate(&db, "ABC-001");
        let before = db.get_item("ABC-001").unwrap().unwrap();

        assert_eq!(
            db.insert_item("ABC-001", "Duplicate title").unwrap(),
            InsertOutcome::AlreadyExists
        );

        let after = db.get_item("ABC-001").unwrap().unwrap();
        assert_eq!(before, after);
        assert_eq!(db.count().unwrap(), 1);
    }

    #[test]
    fn test_rating_range() {
        let db = db_with_item();
        assert!(db.update_rating("ABC-001", Some(0)).is_err());
        assert!(db.update_rating("ABC-001", Some(11)).is_err());
        assert!(db.update_rating("ABC-001", Some(1)).unwrap());
        assert!(db.update_rating("ABC-001", Some(10)).unwrap());
        assert_eq!(db.get_item("ABC-001").unwrap().unwrap().rating, Some(10));

        assert!(db.update_rating("ABC-001", None).unwrap());
        assert_eq!(db.get_item("ABC-001").unwrap().unwrap().rating, None);
    }

    #[test]
    fn test_update_unknown_id() {
        let db = db_with_item();
        assert!(!db.update_rating("nope-1", Some(5)).unwrap());
        assert!(!db.update_comment("nope-1", Some("hi")).unwrap());
    }

    #[test]
    fn test_trigger_refreshes_timestamp_on_change_only() {
        let db = db_with_item();
        backdate(&db, "ABC-001");
        let old = db.get_item("ABC-001").unwrap().unwrap().timestamp;

        // 值未變動時不更新時間
        assert!(db.update_comment("ABC-001", None).unwrap());
        assert_eq!(db.get_item("ABC-001").unwrap().unwrap().timestamp, old);

        assert!(db.update_comment("ABC-001", Some("Great item!")).unwrap());
        let item = db.get_item("ABC-001").unwrap().unwrap();
        assert_eq!(item.comment.as_deref(), Some("Great item!"));
        assert!(item.timestamp > old);
    }
}
