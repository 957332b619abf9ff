//! File Audio Source - 本地文件系统音频来源
//!
//! 实现 AudioSourcePort trait：大小取自文件元数据，时长用 symphonia 探测

use async_trait::async_trait;
use std::fs::File;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tokio::fs;

use crate::application::ports::{AudioFileInfo, AudioSourceError, AudioSourcePort};
use crate::domain::content::{AudioFormat, SourceLocator};

/// 文件系统音频来源
#[derive(Debug, Clone, Default)]
pub struct FileAudioSource;

impl FileAudioSource {
    pub fn new() -> Self {
        Self
    }
}

/// 探测音频时长（秒），无法确定时返回 None
///
/// 只读取容器头部，不解码音频数据。
pub fn probe_duration(path: &Path) -> Option<f64> {
    let file = File::open(path).ok()?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .ok()?;

    let track = probed.format.default_track()?;
    let params = &track.codec_params;

    if let (Some(time_base), Some(frames)) = (params.time_base, params.n_frames) {
        let time = time_base.calc_time(frames);
        return Some(time.seconds as f64 + time.frac);
    }

    let frames = params.n_frames?;
    let sample_rate = params.sample_rate?;
    if sample_rate == 0 {
        return None;
    }
    Some(frames as f64 / sample_rate as f64)
}

#[async_trait]
impl AudioSourcePort for FileAudioSource {
    async fn describe(&self, path: &Path) -> Result<AudioFileInfo, AudioSourceError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AudioSourceError::FileNotFound(path.display().to_string()))?
            .to_string();

        if AudioFormat::from_file_name(&file_name).is_none() {
            return Err(AudioSourceError::UnsupportedFormat(file_name));
        }

        let metadata = fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AudioSourceError::FileNotFound(path.display().to_string())
            } else {
                AudioSourceError::IoError(e.to_string())
            }
        })?;

        if !metadata.is_file() {
            return Err(AudioSourceError::FileNotFound(path.display().to_string()));
        }

        let probe_path = path.to_path_buf();
        let duration_secs = tokio::task::spawn_blocking(move || probe_duration(&probe_path))
            .await
            .map_err(|e| AudioSourceError::IoError(format!("Probe task failed: {}", e)))?;

        if duration_secs.is_none() {
            tracing::debug!(path = %path.display(), "Could not determine audio duration");
        }

        Ok(AudioFileInfo {
            file_name,
            locator: SourceLocator::new(path.to_path_buf()),
            size_bytes: metadata.len(),
            duration_secs,
        })
    }

    async fn read(&self, locator: &SourceLocator) -> Result<Vec<u8>, AudioSourceError> {
        fs::read(locator.as_path()).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AudioSourceError::FileNotFound(locator.to_string())
            } else {
                AudioSourceError::IoError(e.to_string())
            }
        })
    }
}
