//! Content Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{AudioTrack, Chapter, ContentError};
use crate::domain::ordering::{normalize, renumber, sorted_by_order, Ordered};
use crate::domain::summary::{total_duration, total_size};

/// 内容的两种互斥组织方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ContentBody {
    /// 平铺模式：直接挂在内容下的音频轨道
    Flat { tracks: Vec<AudioTrack> },
    /// 章节模式：有序章节，每章包含有序轨道
    Chaptered { chapters: Vec<Chapter> },
}

impl Default for ContentBody {
    fn default() -> Self {
        Self::Chaptered {
            chapters: Vec::new(),
        }
    }
}

/// Content 聚合根
///
/// 不变量:
/// - 独占其 Chapter，Chapter 独占其 AudioTrack
/// - 每次增删后兄弟元素的 order 从 0 开始连续
/// - createdAt / updatedAt 由远端服务维护，本地不设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    title: String,
    description: Option<String>,
    icon: Option<Vec<u8>>,
    cover: Option<Vec<u8>>,
    body: ContentBody,
}

impl Content {
    /// 创建空内容（章节模式）
    ///
    /// 标题在这里不做校验：空白标题由发布校验统一报告。
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            icon: None,
            cover: None,
            body: ContentBody::default(),
        }
    }

    /// 平铺模式内容，轨道 order 原样保留（重复的 order 由发布校验报告）
    pub fn flat(title: impl Into<String>, tracks: Vec<AudioTrack>) -> Self {
        let mut content = Self::new(title);
        content.body = ContentBody::Flat { tracks };
        content
    }

    /// 章节模式内容，章节 order 原样保留（重复的 order 由发布校验报告）
    pub fn chaptered(title: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        let mut content = Self::new(title);
        content.body = ContentBody::Chaptered { chapters };
        content
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.set_description(description);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
    }

    pub fn set_icon(&mut self, icon: Option<Vec<u8>>) {
        self.icon = icon;
    }

    pub fn set_cover(&mut self, cover: Option<Vec<u8>>) {
        self.cover = cover;
    }

    /// 追加章节，返回新章节的 order
    ///
    /// 空的平铺内容会切换为章节模式；已有平铺音频时拒绝。
    pub fn add_chapter(&mut self, chapter: Chapter) -> Result<u32, ContentError> {
        if let ContentBody::Flat { tracks } = &self.body {
            if !tracks.is_empty() {
                return Err(ContentError::FlatModeInUse);
            }
            self.body = ContentBody::default();
        }

        match &mut self.body {
            ContentBody::Chaptered { chapters } => {
                normalize(chapters);
                chapters.push(chapter);
                renumber(chapters);
                Ok((chapters.len() - 1) as u32)
            }
            ContentBody::Flat { .. } => Err(ContentError::FlatModeInUse),
        }
    }

    /// 按 order 删除章节，其余章节重新编号
    pub fn remove_chapter(&mut self, order: u32) -> Result<Chapter, ContentError> {
        let ContentBody::Chaptered { chapters } = &mut self.body else {
            return Err(ContentError::ChapterNotFound(order));
        };

        let position = chapters
            .iter()
            .position(|c| c.order() == order)
            .ok_or(ContentError::ChapterNotFound(order))?;
        let removed = chapters.remove(position);
        normalize(chapters);
        Ok(removed)
    }

    pub fn chapter_mut(&mut self, order: u32) -> Option<&mut Chapter> {
        match &mut self.body {
            ContentBody::Chaptered { chapters } => {
                chapters.iter_mut().find(|c| c.order() == order)
            }
            ContentBody::Flat { .. } => None,
        }
    }

    /// 平铺模式追加轨道
    ///
    /// 空的章节内容会切换为平铺模式；已有章节时拒绝。
    pub fn add_tracks(
        &mut self,
        new_tracks: impl IntoIterator<Item = AudioTrack>,
    ) -> Result<(), ContentError> {
        if let ContentBody::Chaptered { chapters } = &self.body {
            if !chapters.is_empty() {
                return Err(ContentError::ChapteredModeInUse);
            }
            self.body = ContentBody::Flat { tracks: Vec::new() };
        }

        if let ContentBody::Flat { tracks } = &mut self.body {
            normalize(tracks);
            tracks.extend(new_tracks);
            renumber(tracks);
        }
        Ok(())
    }

    /// 平铺模式按 order 删除轨道，返回删除数量
    pub fn remove_tracks(&mut self, orders: &[u32]) -> usize {
        match &mut self.body {
            ContentBody::Flat { tracks } => {
                let before = tracks.len();
                tracks.retain(|t| !orders.contains(&t.order()));
                normalize(tracks);
                before - tracks.len()
            }
            ContentBody::Chaptered { .. } => 0,
        }
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

    pub fn cover(&self) -> Option<&[u8]> {
        self.cover.as_deref()
    }

    pub fn body(&self) -> &ContentBody {
        &self.body
    }

    /// 章节模式下的章节，平铺模式返回空切片
    pub fn chapters(&self) -> &[Chapter] {
        match &self.body {
            ContentBody::Chaptered { chapters } => chapters,
            ContentBody::Flat { .. } => &[],
        }
    }

    /// 按发布顺序列出全部轨道
    pub fn tracks_in_publish_order(&self) -> Vec<&AudioTrack> {
        match &self.body {
            ContentBody::Flat { tracks } => sorted_by_order(tracks),
            ContentBody::Chaptered { chapters } => sorted_by_order(chapters)
                .into_iter()
                .flat_map(|chapter| sorted_by_order(chapter.tracks()))
                .collect(),
        }
    }

    pub fn track_count(&self) -> usize {
        self.tracks_in_publish_order().len()
    }

    pub fn total_duration(&self) -> f64 {
        total_duration(self.tracks_in_publish_order())
    }

    pub fn total_size(&self) -> u64 {
        total_size(self.tracks_in_publish_order())
    }
}
