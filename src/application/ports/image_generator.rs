//! Image Generator Port - 图片生成服务抽象
//!
//! 根据文本提示词生成图片字节，供 UI/CLI 层在发布前填充图标与封面

use async_trait::async_trait;
use thiserror::Error;

/// 图片生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Authentication rejected: {0}")]
    AuthenticationRejected(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),
}

/// Image Generator Port
#[async_trait]
pub trait ImageGeneratorPort: Send + Sync {
    /// 是否已通过认证
    fn is_authenticated(&self) -> bool;

    /// 使用 API key 认证；空白 key 不发起网络请求直接失败
    async fn authenticate(&self, api_key: &str) -> Result<(), GenerationError>;

    /// 生成指定尺寸的图片，返回 PNG 字节
    ///
    /// 整体视为原子操作，不做流式返回。
    async fn generate_image(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, GenerationError>;
}
