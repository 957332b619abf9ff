//! Content Context - Entities

use serde::{Deserialize, Serialize};

use super::{ContentError, SourceLocator};
use crate::domain::ordering::{normalize, renumber, Ordered};

/// 音频轨道
///
/// 不变量:
/// - order 在所属列表内唯一，从 0 开始连续
/// - 不脱离所属 Chapter / Content 存在
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    file_name: String,
    source: SourceLocator,
    duration_secs: Option<f64>,
    size_bytes: u64,
    order: u32,
}

impl AudioTrack {
    pub fn new(file_name: impl Into<String>, source: SourceLocator, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            source,
            duration_secs: None,
            size_bytes,
            order: 0,
        }
    }

    /// 设置时长；负数或非有限值视为未知
    pub fn with_duration(mut self, duration_secs: Option<f64>) -> Self {
        self.duration_secs = duration_secs.filter(|d| d.is_finite() && *d >= 0.0);
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &SourceLocator {
        &self.source
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

impl Ordered for AudioTrack {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// 章节
///
/// 不变量:
/// - title 非空白
/// - 发布时至少包含一条音频轨道（由发布校验检查）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    title: String,
    description: Option<String>,
    icon: Option<Vec<u8>>,
    tracks: Vec<AudioTrack>,
    order: u32,
}

impl Chapter {
    /// 创建章节，标题去除首尾空白后不能为空
    pub fn new(title: impl Into<String>) -> Result<Self, ContentError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ContentError::BlankChapterTitle);
        }
        Ok(Self {
            title,
            description: None,
            icon: None,
            tracks: Vec::new(),
            order: 0,
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.set_description(description);
        self
    }

    /// 原样保留给定轨道的 order（例如来自外部编辑结果），重复的 order 由发布校验报告
    pub fn with_tracks(mut self, tracks: Vec<AudioTrack>) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
    }

    pub fn set_icon(&mut self, icon: Option<Vec<u8>>) {
        self.icon = icon;
    }

    /// 追加轨道到末尾，并重新编号
    pub fn add_tracks(&mut self, tracks: impl IntoIterator<Item = AudioTrack>) {
        normalize(&mut self.tracks);
        self.tracks.extend(tracks);
        renumber(&mut self.tracks);
    }

    /// 按 order 删除轨道，返回删除数量；剩余轨道重新编号
    pub fn remove_tracks(&mut self, orders: &[u32]) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|track| !orders.contains(&track.order()));
        normalize(&mut self.tracks);
        before - self.tracks.len()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn icon(&self) -> Option<&[u8]> {
        self.icon.as_deref()
    }

    pub fn tracks(&self) -> &[AudioTrack] {
        &self.tracks
    }

    pub fn has_audio(&self) -> bool {
        !self.tracks.is_empty()
    }
}

impl Ordered for Chapter {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}
