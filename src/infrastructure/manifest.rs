//! Publish Manifest - TOML 描述的待发布内容
//!
//! ```toml
//! title = "睡前故事"
//! description = "七个短篇"
//! icon = "art/icon.png"            # 或 icon_prompt = "..."
//! cover_prompt = "a sleepy fox under the moon"
//!
//! [[chapters]]
//! title = "第一章"
//! icon_prompt = "a moon"
//! tracks = ["audio/01.mp3", "audio/02.mp3"]
//! ```
//!
//! 平铺模式用顶层 `tracks = [...]` 代替 `[[chapters]]`。
//! 相对路径以清单文件所在目录为基准。

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::application::commands::{GenerateArtwork, ImportTracks};
use crate::application::{ApplicationError, GenerateArtworkHandler, ImportTracksHandler};
use crate::domain::content::{ArtworkTarget, Chapter, Content, ContentError, UploadStep};
use crate::infrastructure::adapters::fit_exact;

/// 清单错误
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid manifest: {0}")]
    Parse(String),

    #[error("Invalid image {path}: {message}")]
    Image { path: String, message: String },

    #[error("Artwork generation failed: {0}")]
    Artwork(#[from] ApplicationError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// 章节清单
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterManifest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<PathBuf>,
    #[serde(default)]
    pub icon_prompt: Option<String>,
    #[serde(default)]
    pub tracks: Vec<PathBuf>,
}

/// 内容清单
#[derive(Debug, Clone, Deserialize)]
pub struct ContentManifest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<PathBuf>,
    #[serde(default)]
    pub icon_prompt: Option<String>,
    #[serde(default)]
    pub cover: Option<PathBuf>,
    #[serde(default)]
    pub cover_prompt: Option<String>,
    #[serde(default)]
    pub tracks: Vec<PathBuf>,
    #[serde(default)]
    pub chapters: Vec<ChapterManifest>,
}

impl ContentManifest {
    /// 读取并解析清单，相对路径解析为以清单目录为基准的路径
    pub async fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ManifestError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut manifest = Self::parse(&text)?;
        if let Some(base) = path.parent() {
            manifest.resolve_paths(base);
        }
        Ok(manifest)
    }

    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        toml::from_str(text).map_err(|e| ManifestError::Parse(e.to_string()))
    }

    /// 是否有需要生成的图片
    pub fn needs_generation(&self) -> bool {
        (self.icon.is_none() && has_prompt(&self.icon_prompt))
            || (self.cover.is_none() && has_prompt(&self.cover_prompt))
            || self
                .chapters
                .iter()
                .any(|c| c.icon.is_none() && has_prompt(&c.icon_prompt))
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        self.icon.iter_mut().for_each(resolve);
        self.cover.iter_mut().for_each(resolve);
        self.tracks.iter_mut().for_each(resolve);
        for chapter in &mut self.chapters {
            chapter.icon.iter_mut().for_each(resolve);
            chapter.tracks.iter_mut().for_each(resolve);
        }
    }
}

fn has_prompt(prompt: &Option<String>) -> bool {
    prompt.as_deref().map(|p| !p.trim().is_empty()).unwrap_or(false)
}

/// 把清单组装成 Content
///
/// 图片文件缩放为目标尺寸；缺少文件但给出提示词时调用生成服务（未提供 artwork 时跳过）。
/// 无法读取或格式不支持的音频文件会被跳过，由发布校验报告空章节。
pub async fn assemble(
    manifest: &ContentManifest,
    import: &ImportTracksHandler,
    artwork: Option<&GenerateArtworkHandler>,
) -> Result<Content, ManifestError> {
    assemble_with(manifest, import, artwork, None).await
}

/// 为续传组装 Content
///
/// 排在 `from` 之前的步骤已经上传过，对应的提示词不再调用生成服务。
pub async fn assemble_for_resume(
    manifest: &ContentManifest,
    import: &ImportTracksHandler,
    artwork: Option<&GenerateArtworkHandler>,
    from: &UploadStep,
) -> Result<Content, ManifestError> {
    assemble_with(manifest, import, artwork, Some(from)).await
}

async fn assemble_with(
    manifest: &ContentManifest,
    import: &ImportTracksHandler,
    artwork: Option<&GenerateArtworkHandler>,
    resume_from: Option<&UploadStep>,
) -> Result<Content, ManifestError> {
    let generator = Generator {
        handler: artwork,
        resume_from,
    };

    let mut content = if manifest.chapters.is_empty() {
        let imported = import
            .handle(ImportTracks {
                paths: manifest.tracks.clone(),
                first_order: 0,
            })
            .await;
        Content::flat(manifest.title.trim(), imported.tracks)
    } else {
        if !manifest.tracks.is_empty() {
            tracing::warn!(
                ignored_tracks = manifest.tracks.len(),
                "Manifest has both tracks and chapters, using chapters"
            );
        }

        let mut content = Content::new(manifest.title.trim());
        for (index, chapter_manifest) in manifest.chapters.iter().enumerate() {
            let imported = import
                .handle(ImportTracks {
                    paths: chapter_manifest.tracks.clone(),
                    first_order: 0,
                })
                .await;

            let mut chapter = Chapter::new(chapter_manifest.title.as_str())?
                .with_description(chapter_manifest.description.clone());
            chapter.add_tracks(imported.tracks);
            // add_chapter 按追加顺序编号，第 index 个章节的 order 即 index
            chapter.set_icon(
                resolve_artwork(
                    chapter_manifest.icon.as_deref(),
                    chapter_manifest.icon_prompt.as_deref(),
                    ArtworkTarget::ChapterIcon,
                    UploadStep::chapter_icon(index as u32),
                    &generator,
                )
                .await?,
            );
            content.add_chapter(chapter)?;
        }
        content
    };

    content.set_description(manifest.description.clone());
    content.set_icon(
        resolve_artwork(
            manifest.icon.as_deref(),
            manifest.icon_prompt.as_deref(),
            ArtworkTarget::ContentIcon,
            UploadStep::icon(),
            &generator,
        )
        .await?,
    );
    content.set_cover(
        resolve_artwork(
            manifest.cover.as_deref(),
            manifest.cover_prompt.as_deref(),
            ArtworkTarget::Cover,
            UploadStep::cover(),
            &generator,
        )
        .await?,
    );

    Ok(content)
}

/// 提示词生成：可选的生成处理器，以及续传起点
struct Generator<'a> {
    handler: Option<&'a GenerateArtworkHandler>,
    resume_from: Option<&'a UploadStep>,
}

async fn resolve_artwork(
    path: Option<&Path>,
    prompt: Option<&str>,
    target: ArtworkTarget,
    step: UploadStep,
    generator: &Generator<'_>,
) -> Result<Option<Vec<u8>>, ManifestError> {
    let (width, height) = target.dimensions();

    if let Some(path) = path {
        let raw = tokio::fs::read(path).await.map_err(|e| ManifestError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let image = fit_exact(&raw, width, height).map_err(|e| ManifestError::Image {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        return Ok(Some(image));
    }

    let Some(prompt) = prompt.filter(|p| !p.trim().is_empty()) else {
        return Ok(None);
    };

    if let Some(from) = generator.resume_from.filter(|from| step.precedes(from)) {
        tracing::debug!(step = %step, from = %from, "Already uploaded, skipping generation");
        return Ok(None);
    }

    let Some(handler) = generator.handler else {
        tracing::warn!(target_kind = ?target, "No image generator available, skipping prompt");
        return Ok(None);
    };

    let response = handler
        .handle(GenerateArtwork {
            prompt: prompt.to_string(),
            target,
        })
        .await?;
    Ok(Some(response.image))
}
