//! HTTP Image Client - 调用图片生成服务
//!
//! 实现 ImageGeneratorPort trait
//!
//! 生成服务 API:
//! GET  {base}/models                    验证 key
//! POST {base}/images/generations        {"model", "prompt", "n", "size", "quality", "response_format": "url"}
//! Response: {"data": [{"url": "..."}]}，再 GET 该 url 取图片字节

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;

use super::resize::fit_exact;
use crate::application::ports::{GenerationError, ImageGeneratorPort};

/// 图片生成请求体 (JSON)
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: String,
    quality: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

/// HTTP 图片生成客户端配置
#[derive(Debug, Clone)]
pub struct HttpImageClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    pub model: String,
    pub quality: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpImageClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "dall-e-3".to_string(),
            quality: "standard".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpImageClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 图片生成客户端
pub struct HttpImageClient {
    client: Client,
    config: HttpImageClientConfig,
    api_key: RwLock<Option<String>>,
}

impl HttpImageClient {
    pub fn new(config: HttpImageClientConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key: RwLock::new(None),
        })
    }

    pub fn with_default_config() -> Result<Self, GenerationError> {
        Self::new(HttpImageClientConfig::default())
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.config.base_url.trim_end_matches('/'))
    }

    fn generations_url(&self) -> String {
        format!(
            "{}/images/generations",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn current_key(&self) -> Option<String> {
        match self.api_key.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_key(&self, key: Option<String>) {
        match self.api_key.write() {
            Ok(mut guard) => *guard = key,
            Err(poisoned) => *poisoned.into_inner() = key,
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self.client.get(url).send().await.map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        Ok(response
            .bytes()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("Failed to read image: {}", e)))?
            .to_vec())
    }
}

fn map_send_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout
    } else if e.is_connect() {
        GenerationError::NetworkError(format!("Cannot connect to generation service: {}", e))
    } else {
        GenerationError::NetworkError(e.to_string())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(GenerationError::AuthenticationRejected(format!(
            "HTTP {}: {}",
            status, message
        )));
    }
    Err(GenerationError::ServiceError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ImageGeneratorPort for HttpImageClient {
    fn is_authenticated(&self) -> bool {
        self.current_key().is_some()
    }

    async fn authenticate(&self, api_key: &str) -> Result<(), GenerationError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GenerationError::AuthenticationRejected(
                "API key is blank".to_string(),
            ));
        }

        let response = self
            .client
            .get(self.models_url())
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(map_send_error)?;

        if let Err(e) = ensure_success(response).await {
            self.store_key(None);
            return Err(e);
        }

        self.store_key(Some(api_key.to_string()));
        tracing::info!(base_url = %self.config.base_url, "Generation service authenticated");
        Ok(())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, GenerationError> {
        let api_key = self.current_key().ok_or(GenerationError::NotAuthenticated)?;

        let request = GenerationRequest {
            model: &self.config.model,
            prompt,
            n: 1,
            size: format!("{}x{}", width, height),
            quality: &self.config.quality,
            response_format: "url",
        };

        tracing::debug!(
            url = %self.generations_url(),
            prompt_len = prompt.len(),
            size = %request.size,
            "Sending image generation request"
        );

        let response = self
            .client
            .post(self.generations_url())
            .bearer_auth(&api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let body: GenerationResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let image_url = body
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| GenerationError::InvalidResponse("No image URL in response".to_string()))?;

        let raw = self.fetch_bytes(&image_url).await?;
        let image = fit_exact(&raw, width, height)?;

        tracing::info!(
            width = width,
            height = height,
            raw_size = raw.len(),
            png_size = image.len(),
            "Image generated"
        );

        Ok(image)
    }
}
