//! Import Command Handlers - 导入本地音频文件

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::commands::ImportTracks;
use crate::application::ports::AudioSourcePort;
use crate::domain::content::AudioTrack;
use crate::domain::{humanize_size, total_size};

/// 导入响应
#[derive(Debug, Clone)]
pub struct ImportTracksResponse {
    /// 按输入顺序编号的轨道
    pub tracks: Vec<AudioTrack>,
    /// 被跳过的文件及原因
    pub skipped: Vec<(PathBuf, String)>,
}

/// ImportTracks Handler
///
/// 单个文件不可读或格式不支持时跳过它，不影响其余文件
pub struct ImportTracksHandler {
    audio_source: Arc<dyn AudioSourcePort>,
}

impl ImportTracksHandler {
    pub fn new(audio_source: Arc<dyn AudioSourcePort>) -> Self {
        Self { audio_source }
    }

    pub async fn handle(&self, command: ImportTracks) -> ImportTracksResponse {
        let mut tracks = Vec::with_capacity(command.paths.len());
        let mut skipped = Vec::new();

        for path in command.paths {
            match self.audio_source.describe(&path).await {
                Ok(info) => {
                    let order = command.first_order + tracks.len() as u32;
                    tracks.push(info.into_track().with_order(order));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping audio file");
                    skipped.push((path, e.to_string()));
                }
            }
        }

        tracing::info!(
            imported = tracks.len(),
            skipped = skipped.len(),
            size = %humanize_size(total_size(&tracks)),
            "Audio files imported"
        );

        ImportTracksResponse { tracks, skipped }
    }
}
