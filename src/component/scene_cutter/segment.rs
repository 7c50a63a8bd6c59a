//! 片段時間軸建構
//!
//! 將依序抵達的場景邊界時間點轉成連續、無間隙的 `[start, end)` 片段

use log::debug;

/// 半開區間 `[start, end)`，單位為秒
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// 逐步建構片段序列
///
/// 每個邊界會關閉前一個片段並開啟新片段；`close` 補上最後一段。
#[derive(Debug)]
pub struct SegmentBuilder {
    last_boundary: f64,
    segments: Vec<Segment>,
}

impl SegmentBuilder {
    #[must_use]
    pub const fn new(range_start: f64) -> Self {
        Self {
            last_boundary: range_start,
            segments: Vec::new(),
        }
    }

    /// 加入一個絕對時間的邊界，回傳被關閉的片段
    ///
    /// 沒有往前推進的邊界會被忽略，確保每個片段 `end > start`。
    pub fn push_boundary(&mut self, time: f64) -> Option<Segment> {
        if !time.is_finite() || time <= self.last_boundary {
            debug!("忽略未前進的邊界: {time} (目前 {})", self.last_boundary);
            return None;
        }

        let segment = Segment {
            start: self.last_boundary,
            end: time,
        };
        self.segments.push(segment);
        self.last_boundary = time;
        Some(segment)
    }

    /// 以時間軸終點關閉最後一段；終點不在最後邊界之後則不產生片段
    pub fn close(&mut self, end: f64) -> Option<Segment> {
        self.push_boundary(end)
    }

    #[must_use]
    pub const fn last_boundary(&self) -> f64 {
        self.last_boundary
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}

/// 一次性建構：範圍起點、邊界列表、時間軸終點
#[must_use]
pub fn build_segments(range_start: f64, boundaries: &[f64], end: f64) -> Vec<Segment> {
    let mut builder = SegmentBuilder::new(range_start);
    for &boundary in boundaries {
        builder.push_boundary(boundary);
    }
    builder.close(end);
    builder.into_segments()
}
