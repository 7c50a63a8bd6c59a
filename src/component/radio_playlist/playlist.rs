use deunicode::deunicode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PLAYLIST_PREFIX: &str = "Caprice__";

/// 電台類型代碼對照
const STYLES: [(&str, &str); 13] = [
    ("0", "Blues/Funk/Soul"),
    ("1", "Classical"),
    ("2", "Country"),
    ("3", "Electronic"),
    ("4", "Ethnic/Folk/Spiritual"),
    ("5", "Jazz"),
    ("6", "Metal/Hardcore"),
    ("7", "Miscellaneous"),
    ("8", "Pop"),
    ("9", "Rap/Hip Hop"),
    ("10", "Reggae/Ska"),
    ("11", "Rock"),
    ("12", "WAHCOH"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioStation {
    /// 電台名稱；舊版快取使用 `title`
    #[serde(alias = "title")]
    pub name: String,
    pub url: String,
    /// 類型代碼，來源可能是字串或數字
    #[serde(deserialize_with = "style_key_from_value")]
    pub style: String,
}

fn style_key_from_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// 同一類型的電台
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePlaylist {
    pub style_name: String,
    pub stations: Vec<RadioStation>,
}

impl StylePlaylist {
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{PLAYLIST_PREFIX}{}.m3u", normalize_style_name(&self.style_name))
    }

    /// 產生 m3u 內容
    #[must_use]
    pub fn to_m3u(&self) -> String {
        let mut lines = vec!["#EXTM3U".to_string()];
        for station in &self.stations {
            lines.push(format!("#EXTINF:-1,{}", deunicode(&station.name)));
            lines.push(station.url.trim().to_string());
        }
        lines.join("\n")
    }
}

#[must_use]
pub fn style_name(key: &str) -> String {
    STYLES
        .iter()
        .find(|(k, _)| *k == key)
        .map_or_else(|| format!("Unknown_{key}"), |(_, name)| (*name).to_string())
}

/// 轉成 ASCII、`/` 換成 `_`、移除空白
#[must_use]
pub fn normalize_style_name(name: &str) -> String {
    deunicode(name)
        .replace('/', "_")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// 依類型分組（保留類型首次出現的順序）
#[must_use]
pub fn group_by_style(stations: &[RadioStation], sort_by_title: bool) -> Vec<StylePlaylist> {
    let mut keys: Vec<&str> = Vec::new();
    for station in stations {
        if !keys.contains(&station.style.as_str()) {
            keys.push(&station.style);
        }
    }

    keys.into_iter()
        .map(|key| {
            let mut members: Vec<RadioStation> = stations
                .iter()
                .filter(|s| s.style == key)
                .cloned()
                .collect();
            if sort_by_title {
                members.sort_by(|a, b| a.name.cmp(&b.name));
            }
            StylePlaylist {
                style_name: style_name(key),
                stations: members,
            }
        })
        .collect()
}
