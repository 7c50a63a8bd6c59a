use crate::config::Config;
use crate::config::save::save_settings;
use crate::menu::handlers::{
    run_catalog, run_comic_resizer, run_duplicate_lines, run_extension_fixer, run_folder_audit,
    run_manga_packer, run_radio_playlist, run_scene_cutter, run_zero_out,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 媒體資料夾整理工具 ===").cyan().bold());
    println!("{}", style("(按 ESC 離開)").dim());

    let options = [
        "場景變換偵測 (LosslessCut)",
        "補上副檔名",
        "漫畫壓縮檔縮圖",
        "漫畫資料夾轉 CBZ",
        "清空影片檔案",
        "文字檔重複行檢查",
        "資料夾稽核",
        "影片目錄資料庫",
        "電台播放清單",
        "設定",
        "離開",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => run_scene_cutter(term, shutdown_signal, config)?,
        Some(1) => run_extension_fixer(term, shutdown_signal, config)?,
        Some(2) => run_comic_resizer(term, shutdown_signal, config)?,
        Some(3) => run_manga_packer(term, shutdown_signal, config)?,
        Some(4) => run_zero_out(term, shutdown_signal, config)?,
        Some(5) => run_duplicate_lines(term)?,
        Some(6) => run_folder_audit(term, config)?,
        Some(7) => run_catalog(term, shutdown_signal, config)?,
        Some(8) => run_radio_playlist(term, config)?,
        Some(9) => show_settings_menu(term, config)?,
        _ => return Ok(false),
    }

    Ok(true)
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style("=== 設定 ===").cyan().bold());
        println!("{}", style("(按 ESC 返回)").dim());

        let settings = &config.settings;
        let options = [
            format!("場景變換閾值: {}", settings.scene_cutter.min_change),
            format!("漫畫圖片短邊上限: {}", settings.comic_resizer.max_dimension),
            format!("清空檔案重試間隔（秒）: {}", settings.zero_out.retry_delay_secs),
            format!("ffmpeg 路徑: {}", settings.ffmpeg_path),
            format!("ffprobe 路徑: {}", settings.ffprobe_path),
            "返回".to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇要修改的設定")
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        let settings = &mut config.settings;
        match selection {
            Some(0) => {
                settings.scene_cutter.min_change = Input::new()
                    .with_prompt("場景變換閾值 (0-1)")
                    .default(settings.scene_cutter.min_change)
                    .validate_with(|v: &f64| {
                        if (0.0..=1.0).contains(v) {
                            Ok(())
                        } else {
                            Err("必須介於 0 與 1 之間")
                        }
                    })
                    .interact_text()?;
            }
            Some(1) => {
                settings.comic_resizer.max_dimension = Input::new()
                    .with_prompt("圖片短邊上限（像素）")
                    .default(settings.comic_resizer.max_dimension)
                    .interact_text()?;
            }
            Some(2) => {
                settings.zero_out.retry_delay_secs = Input::new()
                    .with_prompt("重試間隔（秒）")
                    .default(settings.zero_out.retry_delay_secs)
                    .interact_text()?;
            }
            Some(3) => {
                settings.ffmpeg_path = Input::new()
                    .with_prompt("ffmpeg 路徑")
                    .default(settings.ffmpeg_path.clone())
                    .interact_text()?;
            }
            Some(4) => {
                settings.ffprobe_path = Input::new()
                    .with_prompt("ffprobe 路徑")
                    .default(settings.ffprobe_path.clone())
                    .interact_text()?;
            }
            _ => break,
        }

        save_settings(&config.settings)?;
        println!("\n{}", style("設定已儲存").green());
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
