//! Fake Image Client - 用于测试与 --dry-run 的图片生成客户端
//!
//! 不调用任何服务，按请求尺寸返回纯色 PNG

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::atomic::{AtomicBool, Ordering};

use super::resize::encode_png;
use crate::application::ports::{GenerationError, ImageGeneratorPort};

/// Fake Image Client
pub struct FakeImageClient {
    authenticated: AtomicBool,
    color: [u8; 4],
}

impl FakeImageClient {
    /// 已认证的客户端
    pub fn new() -> Self {
        Self {
            authenticated: AtomicBool::new(true),
            color: [255, 196, 0, 255],
        }
    }

    pub fn unauthenticated() -> Self {
        let client = Self::new();
        client.authenticated.store(false, Ordering::SeqCst);
        client
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }
}

impl Default for FakeImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGeneratorPort for FakeImageClient {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn authenticate(&self, api_key: &str) -> Result<(), GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::AuthenticationRejected(
                "API key is blank".to_string(),
            ));
        }
        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, GenerationError> {
        if !self.is_authenticated() {
            return Err(GenerationError::NotAuthenticated);
        }

        tracing::debug!(prompt = %prompt, width = width, height = height, "Fake image generated");

        let picture =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(self.color)));
        encode_png(&picture)
    }
}
