use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// 建立統一樣式的進度條
#[must_use]
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let progress_bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
        progress_bar.set_style(style.progress_chars("#>-"));
    }
    progress_bar.set_message(message.to_string());
    progress_bar
}
