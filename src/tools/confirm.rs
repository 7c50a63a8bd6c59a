use anyhow::Result;
use dialoguer::Confirm;

/// 危險操作前的確認；`assume_yes` 為真時直接略過提示
pub fn confirm_action(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
