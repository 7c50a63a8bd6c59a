//! 影片目錄資料庫元件
//!
//! 解析 `[ID] 說明` 形式的檔名並維護 SQLite 目錄（評分、備註）

mod database;
mod filename_parser;
mod main;

pub use database::{CatalogDatabase, CatalogItem, InsertOutcome, RATING_RANGE};
pub use filename_parser::{CatalogEntry, extract_ids, parse_catalog_filename};
pub use main::{CatalogManager, ImportSummary, parse_rating_arg};
