//! HTTP Content Client - 调用远端内容服务
//!
//! 实现 RemoteContentPort trait
//!
//! 内容服务 API:
//! GET    {base}/user                                验证 key
//! POST   {base}/content                             {"title", "description", "language"} -> {"id"}
//! POST   {base}/content/{id}/icon                   multipart "icon"  (icon.png)
//! POST   {base}/content/{id}/cover                  multipart "cover" (cover.png)
//! POST   {base}/content/{id}/chapters/{order}/icon  multipart "icon"  (chapter_{order}_icon.png)
//! POST   {base}/content/{id}/audio                  multipart "audio" (原始文件名)
//! GET    {base}/content/{id}
//! DELETE {base}/content/{id}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::sync::RwLock;
use std::time::Duration;

use crate::application::ports::{
    AssetUpload, ContainerMeta, RemoteContent, RemoteContentPort, RemoteError,
};
use crate::domain::content::{AssetKind, ContainerId};

#[derive(Debug, Deserialize)]
struct CreateContentResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    id: String,
    #[serde(default)]
    title: String,
    description: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

/// HTTP 内容服务客户端配置
#[derive(Debug, Clone)]
pub struct HttpContentClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 单次请求超时时间（秒），上传大文件时需要足够长
    pub timeout_secs: u64,
}

impl Default for HttpContentClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.yotoplay.com/v1".to_string(),
            timeout_secs: 300,
        }
    }
}

impl HttpContentClientConfig {
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

/// HTTP 内容服务客户端
pub struct HttpContentClient {
    client: Client,
    config: HttpContentClientConfig,
    api_key: RwLock<Option<String>>,
}

impl HttpContentClient {
    pub fn new(config: HttpContentClientConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key: RwLock::new(None),
        })
    }

    pub fn with_default_config() -> Result<Self, RemoteError> {
        Self::new(HttpContentClientConfig::default())
    }

    /// 在 base_url 后追加路径段，每段单独转义（'/' 编码为 %2F）
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| RemoteError::InvalidRequest(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                RemoteError::InvalidRequest(format!(
                    "Base URL cannot carry a path: {}",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 单个容器的 URL: {base}/content/{id}/...
    fn content_url(&self, container_id: &ContainerId, rest: &[&str]) -> Result<Url, RemoteError> {
        let mut segments = vec!["content", container_segment(container_id)?];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    /// 资源类型对应的上传路径
    fn asset_url(&self, container_id: &ContainerId, kind: AssetKind) -> Result<Url, RemoteError> {
        match kind {
            AssetKind::Icon => self.content_url(container_id, &["icon"]),
            AssetKind::Cover => self.content_url(container_id, &["cover"]),
            AssetKind::ChapterIcon { chapter_order } => {
                let order = chapter_order.to_string();
                self.content_url(container_id, &["chapters", order.as_str(), "icon"])
            }
            AssetKind::Audio => self.content_url(container_id, &["audio"]),
        }
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

    fn require_key(&self) -> Result<String, RemoteError> {
        self.current_key().ok_or(RemoteError::NotAuthenticated)
    }
}

/// 容器 ID 只能占据一个路径段；"." 与 ".." 会被 URL 规范化吞掉，直接拒绝
fn container_segment(container_id: &ContainerId) -> Result<&str, RemoteError> {
    match container_id.as_str() {
        "" | "." | ".." => Err(RemoteError::InvalidRequest(format!(
            "Invalid content id: '{}'",
            container_id
        ))),
        id => Ok(id),
    }
}

fn map_send_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else if e.is_connect() {
        RemoteError::NetworkError(format!("Cannot connect to content service: {}", e))
    } else {
        RemoteError::NetworkError(e.to_string())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RemoteError::AuthenticationRejected(format!(
            "HTTP {}: {}",
            status, message
        )));
    }
    Err(RemoteError::ServiceError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteContentPort for HttpContentClient {
    fn is_authenticated(&self) -> bool {
        self.current_key().is_some()
    }

    async fn authenticate(&self, api_key: &str) -> Result<(), RemoteError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(RemoteError::AuthenticationRejected(
                "API key is blank".to_string(),
            ));
        }

        let response = self
            .client
            .get(self.endpoint(&["user"])?)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_send_error)?;

        if let Err(e) = ensure_success(response).await {
            self.store_key(None);
            return Err(e);
        }

        self.store_key(Some(api_key.to_string()));
        tracing::info!(base_url = %self.config.base_url, "Content service authenticated");
        Ok(())
    }

    async fn create_container(&self, meta: &ContainerMeta) -> Result<ContainerId, RemoteError> {
        let api_key = self.require_key()?;

        let url = self.endpoint(&["content"])?;
        tracing::debug!(url = %url, title = %meta.title, "Creating container");

        let response = self
            .client
            .post(url)
            .bearer_auth(&api_key)
            .json(meta)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let body: CreateContentResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        body.id
            .filter(|id| !id.is_empty())
            .map(ContainerId::new)
            .ok_or_else(|| RemoteError::InvalidResponse("No content id in response".to_string()))
    }

    async fn upload_asset(
        &self,
        container_id: &ContainerId,
        upload: AssetUpload,
    ) -> Result<(), RemoteError> {
        let api_key = self.require_key()?;
        let url = self.asset_url(container_id, upload.kind)?;
        let size = upload.data.len();

        let part = Part::bytes(upload.data)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| RemoteError::InvalidResponse(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part(upload.kind.field_name(), part);

        tracing::debug!(
            url = %url,
            file_name = %upload.file_name,
            size = size,
            "Uploading asset"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&api_key)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;
        ensure_success(response).await?;

        Ok(())
    }

    async fn get_container(&self, container_id: &ContainerId) -> Result<RemoteContent, RemoteError> {
        let api_key = self.require_key()?;

        let response = self
            .client
            .get(self.content_url(container_id, &[])?)
            .bearer_auth(&api_key)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let body: ContentResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        Ok(RemoteContent {
            id: ContainerId::new(body.id),
            title: body.title,
            description: body.description,
            created_at: body.created_at,
            updated_at: body.updated_at,
        })
    }

    async fn delete_container(&self, container_id: &ContainerId) -> Result<(), RemoteError> {
        let api_key = self.require_key()?;

        let response = self
            .client
            .delete(self.content_url(container_id, &[])?)
            .bearer_auth(&api_key)
            .send()
            .await
            .map_err(map_send_error)?;
        ensure_success(response).await?;

        tracing::debug!(container_id = %container_id, "Container deleted");
        Ok(())
    }
}
