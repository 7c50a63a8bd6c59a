mod archive;
mod confirm;
mod ffprobe_info;
mod file_scanner;
mod natural_sort;
mod path_validator;
mod progress;

pub use archive::{extract_comic_archive, file_size_mb, zip_directory, zip_files_flat};
pub use confirm::confirm_action;
pub use ffprobe_info::probe_duration;
pub use file_scanner::{
    has_extension, list_direct_files, list_direct_subdirectories, scan_files_recursive,
};
pub use natural_sort::{natural_cmp, sort_paths_naturally};
pub use path_validator::{
    ensure_directory_exists, normalize_input_path, validate_directory_exists,
    validate_file_exists,
};
pub use progress::create_progress_bar;
