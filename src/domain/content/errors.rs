//! Content Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("章节标题不能为空")]
    BlankChapterTitle,

    #[error("章节不存在: order={0}")]
    ChapterNotFound(u32),

    #[error("内容已包含平铺音频，不能再添加章节")]
    FlatModeInUse,

    #[error("内容已包含章节，不能再添加平铺音频")]
    ChapteredModeInUse,
}
