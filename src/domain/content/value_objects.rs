//! Content Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 远端容器标识（由内容服务在创建时生成）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音频来源定位符 - 上传时据此重新打开文件字节
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocator(PathBuf);

impl SourceLocator {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for SourceLocator {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&str> for SourceLocator {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

impl std::fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// 支持的音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    Mp3,
    M4a,
    Wav,
    Wma,
    Aac,
    Flac,
    Ogg,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 7] = [
        Self::Mp3,
        Self::M4a,
        Self::Wav,
        Self::Wma,
        Self::Aac,
        Self::Flac,
        Self::Ogg,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            "wav" => Some(Self::Wav),
            "wma" => Some(Self::Wma),
            "aac" => Some(Self::Aac),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    /// 按文件名后缀推断格式（大小写不敏感）
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Wav => "wav",
            Self::Wma => "wma",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::M4a => "audio/mp4",
            Self::Wav => "audio/wav",
            Self::Wma => "audio/x-ms-wma",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Ogg => "audio/ogg",
        }
    }
}

/// 资源类型 - 一次二进制上传的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// 内容图标（16x16）
    Icon,
    /// 封面
    Cover,
    /// 章节图标，按章节 order 标记
    ChapterIcon { chapter_order: u32 },
    /// 音频轨道
    Audio,
}

impl AssetKind {
    /// multipart 中的字段名
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Icon | Self::ChapterIcon { .. } => "icon",
            Self::Cover => "cover",
            Self::Audio => "audio",
        }
    }

    /// 图片类资源的合成文件名；音频沿用原始文件名
    pub fn synthesized_file_name(&self) -> Option<String> {
        match self {
            Self::Icon => Some("icon.png".to_string()),
            Self::Cover => Some("cover.png".to_string()),
            Self::ChapterIcon { chapter_order } => {
                Some(format!("chapter_{}_icon.png", chapter_order))
            }
            Self::Audio => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::Cover => "cover",
            Self::ChapterIcon { .. } => "chapter_icon",
            Self::Audio => "audio",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生成图片的目标位置及其像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtworkTarget {
    ContentIcon,
    ChapterIcon,
    Cover,
}

impl ArtworkTarget {
    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::ContentIcon | Self::ChapterIcon => (16, 16),
            Self::Cover => (1024, 1024),
        }
    }
}
