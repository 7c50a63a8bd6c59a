use anyhow::{Context, Result};
use image::imageops::FilterType;
use std::path::Path;

/// 計算縮放後尺寸，讓短邊不超過 `max_dimension`；不需要縮小時回傳 `None`
#[must_use]
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    let shorter = width.min(height);
    if shorter == 0 {
        return None;
    }

    let factor = f64::from(max_dimension) / f64::from(shorter);
    if factor >= 1.0 {
        return None;
    }

    let new_width = (f64::from(width) * factor).round().max(1.0) as u32;
    let new_height = (f64::from(height) * factor).round().max(1.0) as u32;
    Some((new_width, new_height))
}

/// macOS 產生的 `._*` 資源檔不是圖片
#[must_use]
pub fn is_resource_fork(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("._"))
}

/// 圖片縮放前後的解析度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageResize {
    pub original: (u32, u32),
    pub resized: (u32, u32),
}

impl ImageResize {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.original != self.resized
    }
}

/// 就地縮小圖片；不需縮小時不改寫檔案
pub fn resize_image_in_place(path: &Path, max_dimension: u32) -> Result<ImageResize> {
    let img = image::open(path).with_context(|| format!("無法開啟圖片: {}", path.display()))?;
    let original = (img.width(), img.height());

    let Some((width, height)) = scaled_dimensions(original.0, original.1, max_dimension) else {
        return Ok(ImageResize {
            original,
            resized: original,
        });
    };

    img.resize_exact(width, height, FilterType::CatmullRom)
        .save(path)
        .with_context(|| format!("無法寫入圖片: {}", path.display()))?;
    Ok(ImageResize {
        original,
        resized: (width, height),
    })
}
