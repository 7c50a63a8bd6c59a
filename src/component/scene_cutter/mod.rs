//! 場景切割元件
//!
//! 以 ffmpeg 串流偵測場景變換，建構連續片段並輸出 LosslessCut 專案檔

mod cut_list;
mod main;
mod scene_detector;
mod segment;

pub use cut_list::{CUT_LIST_VERSION, CutList, CutSegment, cut_list_file_name};
pub use main::{SceneCutter, SceneCutterOptions, SceneCutterSummary};
pub use scene_detector::{SceneDetector, SceneDetectorConfig, parse_pts_time, read_boundaries};
pub use segment::{Segment, SegmentBuilder, build_segments};
