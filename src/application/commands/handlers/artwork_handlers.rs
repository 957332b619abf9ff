//! Artwork Command Handlers - 生成图标与封面

use std::sync::Arc;

use crate::application::commands::GenerateArtwork;
use crate::application::error::ApplicationError;
use crate::application::ports::ImageGeneratorPort;

/// 生成结果
#[derive(Debug, Clone)]
pub struct GenerateArtworkResponse {
    /// PNG 字节，尺寸与目标一致
    pub image: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// GenerateArtwork Handler
///
/// 与发布流程相互独立：生成结果由调用方写入 Content 的 icon / cover
pub struct GenerateArtworkHandler {
    generator: Arc<dyn ImageGeneratorPort>,
}

impl GenerateArtworkHandler {
    pub fn new(generator: Arc<dyn ImageGeneratorPort>) -> Self {
        Self { generator }
    }

    pub async fn handle(&self, command: GenerateArtwork) -> Result<GenerateArtworkResponse, ApplicationError> {
        let prompt = command.prompt.trim();
        if prompt.is_empty() {
            return Err(ApplicationError::validation("Prompt cannot be blank"));
        }

        if !self.generator.is_authenticated() {
            return Err(ApplicationError::NotAuthenticated("generation"));
        }

        let (width, height) = command.target.dimensions();
        let image = self.generator.generate_image(prompt, width, height).await?;

        if image.is_empty() {
            return Err(ApplicationError::ExternalServiceError(
                "Generation returned an empty image".to_string(),
            ));
        }

        tracing::info!(
            artwork = ?command.target,
            width = width,
            height = height,
            bytes = image.len(),
            "Artwork generated"
        );

        Ok(GenerateArtworkResponse {
            image,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::ArtworkTarget;
    use crate::infrastructure::adapters::FakeImageClient;

    #[tokio::test]
    async fn test_generates_target_dimensions() {
        let handler = GenerateArtworkHandler::new(Arc::new(FakeImageClient::new()));

        let response = handler
            .handle(GenerateArtwork {
                prompt: "a red fox".to_string(),
                target: ArtworkTarget::ContentIcon,
            })
            .await
            .unwrap();

        assert_eq!((response.width, response.height), (16, 16));
        let decoded = image::load_from_memory(&response.image).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected() {
        let handler = GenerateArtworkHandler::new(Arc::new(FakeImageClient::new()));
        let err = handler
            .handle(GenerateArtwork {
                prompt: "  ".to_string(),
                target: ArtworkTarget::Cover,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_unauthenticated_generator_rejected() {
        let handler = GenerateArtworkHandler::new(Arc::new(FakeImageClient::unauthenticated()));
        let err = handler
            .handle(GenerateArtwork {
                prompt: "fox".to_string(),
                target: ArtworkTarget::ChapterIcon,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotAuthenticated("generation")));
    }
}
