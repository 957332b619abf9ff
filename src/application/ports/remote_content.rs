//! Remote Content Port - 远端内容服务抽象
//!
//! 定义创建容器、上传资源等远端操作的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::content::{AssetKind, ContainerId};

/// 远端内容服务错误
#[derive(Debug, Error)]
pub enum RemoteError {
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

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// 创建容器时提交的元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerMeta {
    pub title: String,
    pub description: Option<String>,
    pub language: String,
}

/// 一次资源上传：单个二进制部分
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub kind: AssetKind,
    /// multipart 部分的文件名
    pub file_name: String,
    /// MIME 类型
    pub content_type: String,
    pub data: Vec<u8>,
}

/// 远端内容记录（时间戳由服务端维护）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteContent {
    pub id: ContainerId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Remote Content Port
///
/// 每次调用只作用于其目标资源，调用方等待其完成或失败
#[async_trait]
pub trait RemoteContentPort: Send + Sync {
    /// 是否已通过认证
    fn is_authenticated(&self) -> bool;

    /// 使用 API key 认证；空白 key 不发起网络请求直接失败
    async fn authenticate(&self, api_key: &str) -> Result<(), RemoteError>;

    /// 创建容器，返回服务端生成的 ID
    async fn create_container(&self, meta: &ContainerMeta) -> Result<ContainerId, RemoteError>;

    /// 向容器上传一个资源
    async fn upload_asset(
        &self,
        container_id: &ContainerId,
        upload: AssetUpload,
    ) -> Result<(), RemoteError>;

    /// 读取容器信息
    async fn get_container(&self, container_id: &ContainerId) -> Result<RemoteContent, RemoteError>;

    /// 删除容器
    async fn delete_container(&self, container_id: &ContainerId) -> Result<(), RemoteError>;
}
