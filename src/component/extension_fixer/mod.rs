//! 補上副檔名元件

mod main;

pub use main::{ExtensionFixResult, ExtensionFixer, ExtensionFixerOptions, target_file_name};
