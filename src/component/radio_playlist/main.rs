use super::playlist::{RadioStation, group_by_style};
use crate::tools::ensure_directory_exists;
use anyhow::{Context, Result, bail};
use console::style;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CACHE_FILE_NAME: &str = "caprice_radios.json";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RadioPlaylistOptions {
    pub catalog_url: String,
    pub out_dir: PathBuf,
    /// 忽略快取，重新下載電台清單
    pub refresh: bool,
    pub sort_by_title: bool,
}

#[derive(Debug, Default)]
pub struct RadioPlaylistResult {
    pub stations: usize,
    pub playlists_written: Vec<PathBuf>,
    pub errors: usize,
}

/// 電台播放清單產生元件
pub struct RadioPlaylistGenerator;

impl RadioPlaylistGenerator {
    pub fn run(options: &RadioPlaylistOptions) -> Result<RadioPlaylistResult> {
        println!("{}", style("=== 產生電台播放清單 ===").cyan().bold());
        ensure_directory_exists(&options.out_dir)?;

        let stations = Self::load_stations(options)?;
        println!("共 {} 個電台", style(stations.len()).green());

        let mut result = RadioPlaylistResult {
            stations: stations.len(),
            ..Default::default()
        };

        for playlist in group_by_style(&stations, options.sort_by_title) {
            let path = options.out_dir.join(playlist.file_name());
            match fs::write(&path, playlist.to_m3u()) {
                Ok(()) => {
                    println!(
                        "  {} {} ({} 個電台)",
                        style("已寫入:").green(),
                        path.display(),
                        playlist.stations.len()
                    );
                    result.playlists_written.push(path);
                }
                Err(e) => {
                    result.errors += 1;
                    warn!("無法寫入播放清單 {}: {e}", path.display());
                    eprintln!("  {} {}: {e}", style("錯誤:").red(), path.display());
                }
            }
        }

        info!(
            "已產生 {} 個播放清單，失敗 {}",
            result.playlists_written.len(),
            result.errors
        );
        Ok(result)
    }

    fn load_stations(options: &RadioPlaylistOptions) -> Result<Vec<RadioStation>> {
        let cache_path = options.out_dir.join(CACHE_FILE_NAME);

        let radios = if !options.refresh && cache_path.is_file() {
            println!("使用快取: {}", cache_path.display());
            read_cache(&cache_path)?
        } else {
            println!("下載電台清單: {}", options.catalog_url);
            let radios = fetch_radios(&options.catalog_url)?;
            write_cache(&cache_path, &radios)?;
            radios
        };

        parse_stations(&radios)
    }
}

/// 下載電台目錄並取出 `radios` 陣列
pub fn fetch_radios(url: &str) -> Result<Value> {
    let agent = ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build();

    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => bail!("下載電台清單失敗，HTTP 狀態碼 {code}"),
        Err(e) => return Err(e).with_context(|| format!("無法連線: {url}")),
    };

    let catalog: Value = serde_json::from_reader(response.into_reader())
        .context("無法解析電台清單 JSON")?;
    extract_radios(catalog)
}

fn extract_radios(mut catalog: Value) -> Result<Value> {
    match catalog.get_mut("radios").map(Value::take) {
        Some(radios @ Value::Array(_)) => Ok(radios),
        _ => bail!("電台清單缺少 radios 陣列"),
    }
}

fn read_cache(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("無法讀取快取: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("快取格式錯誤: {}", path.display()))
}

fn write_cache(path: &Path, radios: &Value) -> Result<()> {
    let content = serde_json::to_string_pretty(radios)?;
    fs::write(path, content).with_context(|| format!("無法寫入快取: {}", path.display()))?;
    debug!("已寫入快取: {}", path.display());
    Ok(())
}

/// 解析電台陣列，格式不符的項目略過
pub fn parse_stations(radios: &Value) -> Result<Vec<RadioStation>> {
    let Some(items) = radios.as_array() else {
        bail!("電台清單必須是陣列");
    };

    Ok(items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(station) => Some(station),
            Err(e) => {
                warn!("略過格式錯誤的電台: {e}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_extract_radios() {
        let catalog = json!({"version": 1, "radios": [{"name": "A", "url": "u", "style": "1"}]});
        let radios = extract_radios(catalog).unwrap();
        assert_eq!(radios.as_array().unwrap().len(), 1);

        assert!(extract_radios(json!({"stations": []})).is_err());
        assert!(extract_radios(json!({"radios": "nope"})).is_err());
    }

    #[test]
    fn test_parse_stations_skips_malformed() {
        let radios = json!([
            {"name": "A", "url": "u1", "style": "1"},
            {"name": "B"},
            {"name": "C", "url": "u3", "style": 11}
        ]);
        let stations = parse_stations(&radios).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].style, "11");
    }

    #[test]
    fn test_run_uses_cache() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        fs::create_dir_all(&out_dir).unwrap();
        let cache = json!([
            {"name": "Rock One", "url": "http://r1 ", "style": "11"},
            {"name": "Jazz One", "url": "http://j1", "style": "5"},
            {"name": "Odd", "url": "http://o1", "style": "99"}
        ]);
        write_cache(&out_dir.join(CACHE_FILE_NAME), &cache).unwrap();

        let options = RadioPlaylistOptions {
            catalog_url: "http://127.0.0.1:9/unreachable".to_string(),
            out_dir: out_dir.clone(),
            refresh: false,
            sort_by_title: false,
        };
        let result = RadioPlaylistGenerator::run(&options).unwrap();

        assert_eq!(result.stations, 3);
        assert_eq!(result.errors, 0);
        assert_eq!(
            fs::read_to_string(out_dir.join("Caprice__Rock.m3u")).unwrap(),
            "#EXTM3U\n#EXTINF:-1,Rock One\nhttp://r1"
        );
        assert!(out_dir.join("Caprice__Jazz.m3u").is_file());
        assert!(out_dir.join("Caprice__Unknown_99.m3u").is_file());
    }

    #[test]
    fn test_catalog_shape_to_playlists() {
        let catalog = json!({
            "radios": [
                {"name": "Radio Swiss Jazz", "url": "http://jazz.example/stream", "style": "5"},
                {"name": "Rock Antenne", "url": "http://rock.example/stream", "style": "11"},
                {"name": "Jazz Café", "url": "http://cafe.example/stream", "style": 5}
            ]
        });
        let radios = extract_radios(catalog).unwrap();
        let stations = parse_stations(&radios).unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].name, "Radio Swiss Jazz");

        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().to_path_buf();
        write_cache(&out_dir.join(CACHE_FILE_NAME), &radios).unwrap();

        let options = RadioPlaylistOptions {
            catalog_url: "http://127.0.0.1:9/unreachable".to_string(),
            out_dir: out_dir.clone(),
            refresh: false,
            sort_by_title: false,
        };
        let result = RadioPlaylistGenerator::run(&options).unwrap();

        assert_eq!(result.stations, 3);
        assert_eq!(result.playlists_written.len(), 2);
        assert_eq!(
            fs::read_to_string(out_dir.join("Caprice__Jazz.m3u")).unwrap(),
            "#EXTM3U\n#EXTINF:-1,Radio Swiss Jazz\nhttp://jazz.example/stream\n#EXTINF:-1,Jazz Cafe\nhttp://cafe.example/stream"
        );
        assert_eq!(
            fs::read_to_string(out_dir.join("Caprice__Rock.m3u")).unwrap(),
            "#EXTM3U\n#EXTINF:-1,Rock Antenne\nhttp://rock.example/stream"
        );
    }
}
