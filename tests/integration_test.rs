//! 整合測試 - 以暫存資料夾驗證各元件的完整流程

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use image::{ImageBuffer, Rgb};
use media_housekeeping::component::catalog::CatalogDatabase;
use media_housekeeping::component::comic_resizer::ComicResizerOptions;
use media_housekeeping::component::extension_fixer::ExtensionFixerOptions;
use media_housekeeping::component::manga_packer::MangaPackerOptions;
use media_housekeeping::component::scene_cutter::{CutList, Segment, build_segments};
use media_housekeeping::component::{
    CatalogManager, ComicResizer, ExtensionFixer, FolderAuditor, MangaPacker,
};
use media_housekeeping::config::Config;
use tempfile::TempDir;
use zip::ZipArchive;
use zip::write::SimpleFileOptions;

fn shutdown_signal() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

fn zip_names(path: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// 測試 1: 清單匯入、重複匯入、評分與備註
#[test]
fn test_catalog_import_and_update() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("database.db");
    let list_path = temp_dir.path().join("list.txt");
    fs::write(
        &list_path,
        "[ABC-123] First title.mp4\n[XYZ-9] [Warning] Second.mkv\nno bracket here\n",
    )
    .unwrap();

    let manager = CatalogManager::new(shutdown_signal());
    let summary = manager.import_list(&db_path, &list_path).unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.errors, 1);

    let again = manager.import_list(&db_path, &list_path).unwrap();
    assert_eq!(again.inserted, 0);
    assert_eq!(again.already_present, 2);

    assert!(manager.rate(&db_path, "ABC-123", Some(8)).unwrap());
    assert!(!manager.rate(&db_path, "NOPE-1", Some(8)).unwrap());
    assert!(manager.rate(&db_path, "ABC-123", Some(11)).is_err());
    assert!(manager.comment(&db_path, "XYZ-9", Some("keep")).unwrap());

    let db = CatalogDatabase::open(&db_path).unwrap();
    assert_eq!(db.count().unwrap(), 2);
    let item = db.get_item("ABC-123").unwrap().unwrap();
    assert_eq!(item.description, "First title");
    assert_eq!(item.rating, Some(8));
    let second = db.get_item("XYZ-9").unwrap().unwrap();
    assert_eq!(second.description, "[Warning] Second");
    assert_eq!(second.comment.as_deref(), Some("keep"));
}

/// 測試 2: 章節資料夾轉 CBZ，圖片依自然順序排列
#[test]
fn test_manga_pack_single() {
    let temp_dir = TempDir::new().unwrap();
    let manga = temp_dir.path().join("My Manga");
    let chapter = manga.join("Chapter 1");
    let empty_chapter = manga.join("Extras");
    fs::create_dir_all(&chapter).unwrap();
    fs::create_dir_all(&empty_chapter).unwrap();
    for name in ["10.jpg", "2.jpg", "1.png", "notes.txt"] {
        fs::write(chapter.join(name), name).unwrap();
    }

    let config = Config::new().unwrap();
    let packer = MangaPacker::new(config, shutdown_signal());
    let result = packer
        .run(&MangaPackerOptions {
            path: manga.clone(),
            batch: false,
            delete_original: false,
        })
        .unwrap();

    assert_eq!(result.archives_created, 1);
    assert_eq!(result.skipped, 1);
    let cbz = manga.join("Chapter 1.cbz");
    assert_eq!(zip_names(&cbz), vec!["1.png", "2.jpg", "10.jpg"]);
    assert!(chapter.is_dir());
}

/// 測試 3: 漫畫庫批次模式
#[test]
fn test_manga_pack_batch() {
    let temp_dir = TempDir::new().unwrap();
    let library = temp_dir.path();
    for manga in ["A", "B"] {
        let chapter = library.join(manga).join("Vol 1");
        fs::create_dir_all(&chapter).unwrap();
        fs::write(chapter.join("001.jpg"), "page").unwrap();
    }

    let packer = MangaPacker::new(Config::new().unwrap(), shutdown_signal());
    let result = packer
        .run(&MangaPackerOptions {
            path: library.to_path_buf(),
            batch: true,
            delete_original: false,
        })
        .unwrap();

    assert_eq!(result.archives_created, 2);
    assert!(library.join("A").join("Vol 1.cbz").is_file());
    assert!(library.join("B").join("Vol 1.cbz").is_file());
}

/// 測試 4: 補上副檔名，目標已存在時略過
#[test]
fn test_extension_fixer() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("clip"), "a").unwrap();
    fs::write(dir.join("movie.MP4"), "b").unwrap();
    fs::write(dir.join("taken"), "c").unwrap();
    fs::write(dir.join("taken.mp4"), "d").unwrap();

    let fixer = ExtensionFixer::new(shutdown_signal());
    let result = fixer
        .run(&ExtensionFixerOptions {
            directory: dir.to_path_buf(),
            extension: "mp4".to_string(),
            assume_yes: true,
        })
        .unwrap();

    assert_eq!(result.renamed, 1);
    assert!(dir.join("clip.mp4").is_file());
    assert!(dir.join("movie.MP4").is_file());
    assert!(dir.join("taken").is_file());
    assert_eq!(fs::read_to_string(dir.join("taken.mp4")).unwrap(), "d");
}

/// 測試 5: 漫畫壓縮檔縮圖（保留原始檔）
#[test]
fn test_comic_resize_keeps_small_and_shrinks_large() {
    let temp_dir = TempDir::new().unwrap();
    let staging = temp_dir.path().join("staging");
    fs::create_dir_all(&staging).unwrap();
    ImageBuffer::from_pixel(100, 200, Rgb([10u8, 20, 30]))
        .save(staging.join("01.png"))
        .unwrap();
    ImageBuffer::from_pixel(30, 40, Rgb([10u8, 20, 30]))
        .save(staging.join("02.png"))
        .unwrap();

    let comics = temp_dir.path().join("comics");
    fs::create_dir_all(&comics).unwrap();
    let archive_path = comics.join("Vol 1.cbz");
    {
        let mut writer = zip::ZipWriter::new(File::create(&archive_path).unwrap());
        for name in ["01.png", "02.png"] {
            writer
                .start_file(name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(&fs::read(staging.join(name)).unwrap()).unwrap();
        }
        writer.finish().unwrap();
    }
    fs::write(comics.join("Old.rsz.cbz"), "already resized").unwrap();

    let resizer = ComicResizer::new(Config::new().unwrap(), shutdown_signal());
    let summary = resizer
        .run(&ComicResizerOptions {
            directory: comics.clone(),
            max_dimension: 50,
            keep_original: true,
        })
        .unwrap();

    assert_eq!(summary.errors, 0);
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].images_resized, 1);
    assert!(archive_path.is_file());

    let output = comics.join("Vol 1.rsz.cbz");
    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let mut page = Vec::new();
    std::io::copy(&mut archive.by_name("01.png").unwrap(), &mut page).unwrap();
    let resized = image::load_from_memory(&page).unwrap();
    assert_eq!((resized.width(), resized.height()), (50, 100));
}

/// 測試 6: 資料夾稽核
#[test]
fn test_folder_audit_reports() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("season1")).unwrap();
    fs::create_dir_all(root.join("season2")).unwrap();
    fs::write(root.join("season1").join("e01.srt"), "").unwrap();
    fs::write(root.join("season2").join("e01.mkv"), "").unwrap();

    let missing = FolderAuditor::report_folders_without_extension(root, "srt", true).unwrap();
    assert_eq!(missing, vec![root.join("season2")]);

    let files = FolderAuditor::report_files_with_extension(root, "srt", true, 1).unwrap();
    assert_eq!(files, vec!["e01"]);

    assert!(
        FolderAuditor::report_files_with_extension(&root.join("missing"), "srt", false, 0)
            .is_err()
    );
}

/// 測試 7: 片段寫成 LosslessCut 專案檔後可讀回
#[test]
fn test_cut_list_file_contents() {
    let temp_dir = TempDir::new().unwrap();
    let segments = build_segments(0.0, &[1.5, 4.0], 6.0);
    assert_eq!(
        segments,
        vec![
            Segment {
                start: 0.0,
                end: 1.5
            },
            Segment {
                start: 1.5,
                end: 4.0
            },
            Segment {
                start: 4.0,
                end: 6.0
            },
        ]
    );

    let path = temp_dir.path().join("clip-proj.llc");
    CutList::from_segments(&segments, "clip.mp4")
        .write_to(&path)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["mediaFileName"], "clip.mp4");
    let cut_segments = value["cutSegments"].as_array().unwrap();
    assert_eq!(cut_segments.len(), 3);
    assert_eq!(cut_segments[1]["start"], 1.5);
    assert_eq!(cut_segments[1]["end"], 4.0);
    assert_eq!(cut_segments[1]["name"], "");
}
