use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::normalize_input_path;
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use log::warn;
use std::path::{Path, PathBuf};

/// 選擇資料夾：可從最近使用的路徑挑選或輸入新路徑，ESC 回傳 `None`
pub fn prompt_directory(config: &mut Config, prompt: &str) -> Result<Option<PathBuf>> {
    let recent_paths = config.settings.recent_paths.clone();

    let input = if recent_paths.is_empty() {
        Some(prompt_text(prompt)?)
    } else {
        let mut options: Vec<String> = recent_paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let indicator = if Path::new(p).exists() { "✓" } else { "✗" };
                format!("{} [{}] {}", i + 1, indicator, p)
            })
            .collect();
        options.push("輸入新路徑...".to_string());

        println!("{}", style("(按 ESC 返回主選單)").dim());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇路徑")
            .items(&options)
            .default(0)
            .interact_opt()?;

        match selection {
            None => None,
            Some(idx) if idx < recent_paths.len() => Some(recent_paths[idx].clone()),
            Some(_) => Some(prompt_text(prompt)?),
        }
    };

    let Some(input) = input.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    add_recent_path(&mut config.settings, &input);
    if let Err(e) = save_settings(&config.settings) {
        warn!("無法儲存路徑歷史: {e}");
    }

    Ok(Some(PathBuf::from(input)))
}

/// 輸入檔案路徑（不記錄到歷史）
pub fn prompt_file(prompt: &str) -> Result<PathBuf> {
    Ok(PathBuf::from(prompt_text(prompt)?))
}

pub fn prompt_text(prompt: &str) -> Result<String> {
    let value: String = Input::new().with_prompt(prompt).interact_text()?;
    Ok(normalize_input_path(&value))
}

pub fn prompt_text_with_default(prompt: &str, default: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(value.trim().to_string())
}
