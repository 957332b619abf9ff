//! Audio Source Port - 本地音频文件来源
//!
//! 描述待上传的音频文件（文件名、大小、时长），并在上传时重新读取其字节

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::content::{AudioTrack, SourceLocator};

/// 音频来源错误
#[derive(Debug, Error)]
pub enum AudioSourceError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 音频文件描述
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFileInfo {
    pub file_name: String,
    pub locator: SourceLocator,
    pub size_bytes: u64,
    /// 无法探测时为 None
    pub duration_secs: Option<f64>,
}

impl AudioFileInfo {
    /// 转为轨道实体（order 由所属列表重新编号）
    pub fn into_track(self) -> AudioTrack {
        AudioTrack::new(self.file_name, self.locator, self.size_bytes)
            .with_duration(self.duration_secs)
    }
}

/// Audio Source Port
#[async_trait]
pub trait AudioSourcePort: Send + Sync {
    /// 描述一个本地音频文件
    async fn describe(&self, path: &Path) -> Result<AudioFileInfo, AudioSourceError>;

    /// 按定位符读取文件字节
    async fn read(&self, locator: &SourceLocator) -> Result<Vec<u8>, AudioSourceError>;
}
