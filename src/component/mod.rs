//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod catalog;
pub mod comic_resizer;
pub mod duplicate_lines;
pub mod extension_fixer;
pub mod folder_audit;
pub mod manga_packer;
pub mod radio_playlist;
pub mod scene_cutter;
pub mod zero_out;

pub use catalog::CatalogManager;
pub use comic_resizer::ComicResizer;
pub use duplicate_lines::DuplicateLineFinder;
pub use extension_fixer::ExtensionFixer;
pub use folder_audit::FolderAuditor;
pub use manga_packer::MangaPacker;
pub use radio_playlist::RadioPlaylistGenerator;
pub use scene_cutter::SceneCutter;
pub use zero_out::ZeroOut;
