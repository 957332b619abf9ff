//! Artwork Commands

use crate::domain::content::ArtworkTarget;

/// 生成图标/封面命令
#[derive(Debug, Clone)]
pub struct GenerateArtwork {
    pub prompt: String,
    pub target: ArtworkTarget,
}
