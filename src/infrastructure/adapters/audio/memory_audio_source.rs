//! In-Memory Audio Source - 内存中的音频文件

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};

use crate::application::ports::{AudioFileInfo, AudioSourceError, AudioSourcePort};
use crate::domain::content::{AudioFormat, SourceLocator};

struct StoredFile {
    data: Vec<u8>,
    duration_secs: Option<f64>,
}

/// 内存音频来源
///
/// 路径到字节的映射，测试与演示中代替本地文件系统
pub struct InMemoryAudioSource {
    files: DashMap<PathBuf, StoredFile>,
}

impl InMemoryAudioSource {
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
        }
    }

    /// 放入一个文件
    pub fn insert(&self, path: impl Into<PathBuf>, data: Vec<u8>, duration_secs: Option<f64>) {
        self.files.insert(
            path.into(),
            StoredFile {
                data,
                duration_secs,
            },
        );
    }

    /// 移除一个文件（模拟上传前文件被删除）
    pub fn remove(&self, path: &Path) {
        self.files.remove(path);
    }
}

impl Default for InMemoryAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSourcePort for InMemoryAudioSource {
    async fn describe(&self, path: &Path) -> Result<AudioFileInfo, AudioSourceError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AudioSourceError::FileNotFound(path.display().to_string()))?
            .to_string();

        if AudioFormat::from_file_name(&file_name).is_none() {
            return Err(AudioSourceError::UnsupportedFormat(file_name));
        }

        let file = self
            .files
            .get(path)
            .ok_or_else(|| AudioSourceError::FileNotFound(path.display().to_string()))?;

        Ok(AudioFileInfo {
            file_name,
            locator: SourceLocator::new(path.to_path_buf()),
            size_bytes: file.data.len() as u64,
            duration_secs: file.duration_secs,
        })
    }

    async fn read(&self, locator: &SourceLocator) -> Result<Vec<u8>, AudioSourceError> {
        self.files
            .get(locator.as_path())
            .map(|file| file.data.clone())
            .ok_or_else(|| AudioSourceError::FileNotFound(locator.to_string()))
    }
}
