//! 命令列介面
//!
//! 每個子命令對應一個元件；未指定子命令時進入互動選單

use crate::component::catalog::parse_rating_arg;
use crate::component::comic_resizer::ComicResizerOptions;
use crate::component::extension_fixer::ExtensionFixerOptions;
use crate::component::manga_packer::MangaPackerOptions;
use crate::component::radio_playlist::RadioPlaylistOptions;
use crate::component::scene_cutter::{SceneCutterOptions, SceneDetectorConfig};
use crate::component::zero_out::ZeroOutOptions;
use crate::component::{
    CatalogManager, ComicResizer, DuplicateLineFinder, ExtensionFixer, FolderAuditor, MangaPacker,
    RadioPlaylistGenerator, SceneCutter, ZeroOut,
};
use crate::config::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "media_housekeeping")]
#[command(about = "媒體資料夾整理工具組")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 偵測場景變換並輸出 LosslessCut 專案檔 (*-proj.llc)
    Scenes {
        /// 要遞迴掃描的影片資料夾
        files_dir: PathBuf,

        /// 輸出資料夾（預設與影片資料夾相同）
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// 場景變換閾值 (0-1)
        #[arg(long)]
        min_change: Option<f64>,

        /// 串流索引（預設第一個視訊串流）
        #[arg(long)]
        stream: Option<u32>,

        /// 起始時間（秒）
        #[arg(long, default_value_t = 0.0)]
        from: f64,

        /// 結束時間（秒）
        #[arg(long)]
        to: Option<f64>,
    },

    /// 為缺少副檔名的檔案補上副檔名
    AddExt {
        dir: PathBuf,

        #[arg(long, default_value = "mp4")]
        ext: String,

        /// 不詢問直接執行
        #[arg(short, long)]
        yes: bool,
    },

    /// 縮小 CBZ/CBR 內的圖片並重新打包成 .rsz.cbz
    ComicResize {
        dir: PathBuf,

        /// 圖片短邊的最大像素
        #[arg(long)]
        max_dimension: Option<u32>,

        /// 保留原始壓縮檔（預設移到垃圾桶）
        #[arg(long)]
        keep_original: bool,
    },

    /// 將漫畫章節資料夾壓縮成 CBZ
    MangaPack {
        path: PathBuf,

        /// 將路徑視為漫畫庫，處理其中每一部漫畫
        #[arg(long)]
        batch: bool,

        /// 轉換後將章節資料夾移到垃圾桶
        #[arg(long)]
        delete: bool,
    },

    /// 將資料夾內的 .mp4 檔清成 0 位元組
    ZeroOut {
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[arg(short, long)]
        yes: bool,

        /// 失敗後重試前等待的秒數
        #[arg(long)]
        retry_delay: Option<u64>,

        /// 最多嘗試次數（預設無限）
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// 列出文字檔中重複的行
    DupeLines { file: PathBuf },

    /// 找出沒有指定副檔名檔案的子資料夾
    MissingExt {
        root: PathBuf,
        ext: String,

        #[arg(short, long)]
        verbose: bool,
    },

    /// 列出指定副檔名的檔案
    ListExt {
        ext: String,

        #[arg(default_value = ".")]
        dir: PathBuf,

        /// 只顯示檔名主體
        #[arg(short = 'e', long)]
        hide_extension: bool,

        /// 搜尋深度（0 = 只有目前資料夾）
        #[arg(short, long, default_value_t = 0)]
        depth: usize,
    },

    /// 影片目錄資料庫
    Catalog {
        #[command(subcommand)]
        action: CatalogCommand,
    },

    /// 依類型產生電台 m3u 播放清單
    Radio {
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// 忽略快取重新下載
        #[arg(long)]
        refresh: bool,

        /// 依電台名稱排序
        #[arg(long)]
        sort: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// 匯入檔名清單（每行一個 `[ID] 說明.mp4`）
    Import {
        #[arg(long)]
        db: Option<PathBuf>,

        #[arg(long)]
        list: PathBuf,
    },

    /// 設定評分（1-10，或 clear 清除）
    Rate {
        #[arg(long)]
        db: Option<PathBuf>,
        id: String,
        rating: String,
    },

    /// 設定備註（省略則清除）
    Comment {
        #[arg(long)]
        db: Option<PathBuf>,
        id: String,
        comment: Option<String>,
    },

    /// 從文字檔擷取 ID
    Ids { file: PathBuf },
}

/// 執行子命令
pub fn dispatch(command: Command, config: Config, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    match command {
        Command::Scenes {
            files_dir,
            out_dir,
            min_change,
            stream,
            from,
            to,
        } => {
            let options = SceneCutterOptions {
                files_dir,
                out_dir,
                detector: SceneDetectorConfig {
                    min_change: min_change.unwrap_or(config.settings.scene_cutter.min_change),
                    stream,
                    from_time: from,
                    to_time: to,
                },
            };
            SceneCutter::new(config, Arc::clone(shutdown_signal)).run(&options)?;
        }
        Command::AddExt { dir, ext, yes } => {
            let options = ExtensionFixerOptions {
                directory: dir,
                extension: ext,
                assume_yes: yes,
            };
            ExtensionFixer::new(Arc::clone(shutdown_signal)).run(&options)?;
        }
        Command::ComicResize {
            dir,
            max_dimension,
            keep_original,
        } => {
            let settings = &config.settings.comic_resizer;
            let options = ComicResizerOptions {
                directory: dir,
                max_dimension: max_dimension.unwrap_or(settings.max_dimension),
                keep_original: keep_original || settings.keep_original,
            };
            ComicResizer::new(config, Arc::clone(shutdown_signal)).run(&options)?;
        }
        Command::MangaPack {
            path,
            batch,
            delete,
        } => {
            let options = MangaPackerOptions {
                path,
                batch,
                delete_original: delete,
            };
            MangaPacker::new(config, Arc::clone(shutdown_signal)).run(&options)?;
        }
        Command::ZeroOut {
            dir,
            yes,
            retry_delay,
            max_attempts,
        } => {
            let mut options = ZeroOutOptions::from_settings(dir, &config.settings.zero_out, yes);
            if let Some(secs) = retry_delay {
                options.retry_delay = Duration::from_secs(secs);
            }
            if max_attempts.is_some() {
                options.max_attempts = max_attempts;
            }
            ZeroOut::new(Arc::clone(shutdown_signal)).run(&options)?;
        }
        Command::DupeLines { file } => {
            DuplicateLineFinder::run(&file)?;
        }
        Command::MissingExt { root, ext, verbose } => {
            FolderAuditor::report_folders_without_extension(&root, &ext, verbose)?;
        }
        Command::ListExt {
            ext,
            dir,
            hide_extension,
            depth,
        } => {
            FolderAuditor::report_files_with_extension(&dir, &ext, hide_extension, depth)?;
        }
        Command::Catalog { action } => run_catalog(action, &config, shutdown_signal)?,
        Command::Radio {
            out_dir,
            refresh,
            sort,
        } => {
            let settings = &config.settings.radio;
            let options = RadioPlaylistOptions {
                catalog_url: settings.catalog_url.clone(),
                out_dir: out_dir.unwrap_or_else(|| PathBuf::from(&settings.out_dir)),
                refresh,
                sort_by_title: sort,
            };
            RadioPlaylistGenerator::run(&options)?;
        }
    }

    Ok(())
}

fn run_catalog(
    action: CatalogCommand,
    config: &Config,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<()> {
    let manager = CatalogManager::new(Arc::clone(shutdown_signal));
    let default_db = || PathBuf::from(&config.settings.catalog_db_path);

    match action {
        CatalogCommand::Import { db, list } => {
            manager.import_list(&db.unwrap_or_else(default_db), &list)?;
        }
        CatalogCommand::Rate { db, id, rating } => {
            let rating = parse_rating_arg(&rating)?;
            manager.rate(&db.unwrap_or_else(default_db), &id, rating)?;
        }
        CatalogCommand::Comment { db, id, comment } => {
            manager.comment(&db.unwrap_or_else(default_db), &id, comment.as_deref())?;
        }
        CatalogCommand::Ids { file } => {
            manager.list_ids(&file)?;
        }
    }

    Ok(())
}
