use super::prompt::{prompt_directory, prompt_file, prompt_text, prompt_text_with_default};
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
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 執行元件並顯示錯誤，結束後等待使用者按 Enter
fn report<T>(term: &Term, result: Result<T>) -> Result<()> {
    if let Err(e) = result {
        eprintln!("{} {e:#}", style("錯誤:").red().bold());
    }
    pause(term)
}

pub fn run_scene_cutter(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let Some(files_dir) = prompt_directory(config, "請輸入影片資料夾路徑")? else {
        return Ok(());
    };

    let options = SceneCutterOptions {
        files_dir,
        out_dir: None,
        detector: SceneDetectorConfig {
            min_change: config.settings.scene_cutter.min_change,
            ..SceneDetectorConfig::default()
        },
    };
    let cutter = SceneCutter::new(config.clone(), Arc::clone(shutdown_signal));
    report(term, cutter.run(&options))
}

pub fn run_extension_fixer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let Some(directory) = prompt_directory(config, "請輸入資料夾路徑")? else {
        return Ok(());
    };
    let extension = prompt_text_with_default("要補上的副檔名", "mp4")?;

    let options = ExtensionFixerOptions {
        directory,
        extension,
        assume_yes: false,
    };
    report(term, ExtensionFixer::new(Arc::clone(shutdown_signal)).run(&options))
}

pub fn run_comic_resizer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let Some(directory) = prompt_directory(config, "請輸入漫畫資料夾路徑")? else {
        return Ok(());
    };

    let settings = &config.settings.comic_resizer;
    let options = ComicResizerOptions {
        directory,
        max_dimension: settings.max_dimension,
        keep_original: settings.keep_original,
    };
    let resizer = ComicResizer::new(config.clone(), Arc::clone(shutdown_signal));
    report(term, resizer.run(&options))
}

pub fn run_manga_packer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let Some(path) = prompt_directory(config, "請輸入漫畫資料夾路徑")? else {
        return Ok(());
    };

    let modes = ["單一漫畫（子資料夾為章節）", "漫畫庫（子資料夾為漫畫）"];
    let Some(mode) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇模式")
        .items(&modes)
        .default(0)
        .interact_on_opt(term)?
    else {
        return Ok(());
    };

    let delete_original = Confirm::new()
        .with_prompt("轉換後要將章節資料夾移到垃圾桶嗎？")
        .default(false)
        .interact()?;

    let options = MangaPackerOptions {
        path,
        batch: mode == 1,
        delete_original,
    };
    let packer = MangaPacker::new(config.clone(), Arc::clone(shutdown_signal));
    report(term, packer.run(&options))
}

pub fn run_zero_out(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let Some(directory) = prompt_directory(config, "請輸入資料夾路徑")? else {
        return Ok(());
    };

    let options = ZeroOutOptions::from_settings(directory, &config.settings.zero_out, false);
    report(term, ZeroOut::new(Arc::clone(shutdown_signal)).run(&options))
}

pub fn run_duplicate_lines(term: &Term) -> Result<()> {
    let file = prompt_file("請輸入文字檔路徑")?;
    report(term, DuplicateLineFinder::run(&file))
}

pub fn run_folder_audit(term: &Term, config: &mut Config) -> Result<()> {
    let modes = ["找出缺少指定副檔名的子資料夾", "列出指定副檔名的檔案"];
    let Some(mode) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇稽核方式")
        .items(&modes)
        .default(0)
        .interact_on_opt(term)?
    else {
        return Ok(());
    };

    let Some(directory) = prompt_directory(config, "請輸入資料夾路徑")? else {
        return Ok(());
    };
    let extension = prompt_text("副檔名")?;

    let result = if mode == 0 {
        FolderAuditor::report_folders_without_extension(&directory, &extension, true).map(|_| ())
    } else {
        let depth: usize = prompt_text_with_default("搜尋深度", "0")?
            .parse()
            .unwrap_or(0);
        let hide_extension = Confirm::new()
            .with_prompt("只顯示檔名主體？")
            .default(false)
            .interact()?;
        FolderAuditor::report_files_with_extension(&directory, &extension, hide_extension, depth)
            .map(|_| ())
    };
    report(term, result)
}

pub fn run_catalog(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let actions = ["匯入檔名清單", "設定評分", "設定備註", "擷取 ID"];
    let Some(action) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("影片目錄資料庫")
        .items(&actions)
        .default(0)
        .interact_on_opt(term)?
    else {
        return Ok(());
    };

    let manager = CatalogManager::new(Arc::clone(shutdown_signal));
    let db_path = PathBuf::from(&config.settings.catalog_db_path);

    let result = match action {
        0 => {
            let list = prompt_file("請輸入檔名清單路徑")?;
            manager.import_list(&db_path, &list).map(|_| ())
        }
        1 => {
            let id = prompt_text("ID")?;
            let rating = prompt_text("評分（1-10 或 clear）")?;
            parse_rating_arg(&rating).and_then(|r| manager.rate(&db_path, &id, r).map(|_| ()))
        }
        2 => {
            let id = prompt_text("ID")?;
            let comment = prompt_text_with_default("備註（留空清除）", "")?;
            let comment = (!comment.is_empty()).then_some(comment.as_str());
            manager.comment(&db_path, &id, comment).map(|_| ())
        }
        _ => {
            let file = prompt_file("請輸入文字檔路徑")?;
            manager.list_ids(&file).map(|_| ())
        }
    };
    report(term, result)
}

pub fn run_radio_playlist(term: &Term, config: &Config) -> Result<()> {
    let refresh = Confirm::new()
        .with_prompt("重新下載電台清單（忽略快取）？")
        .default(false)
        .interact()?;

    let settings = &config.settings.radio;
    let options = RadioPlaylistOptions {
        catalog_url: settings.catalog_url.clone(),
        out_dir: PathBuf::from(&settings.out_dir),
        refresh,
        sort_by_title: false,
    };
    report(term, RadioPlaylistGenerator::run(&options))
}
