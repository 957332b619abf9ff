//! Secret Store Port - API key 存储抽象

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 密钥存储错误
#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Corrupted secret store: {0}")]
    Corrupted(String),
}

/// 需要 API key 的外部服务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// 远端内容服务
    Content,
    /// 图片生成服务
    Generation,
}

impl Provider {
    /// 存储中使用的固定资源名
    pub fn resource_name(&self) -> &'static str {
        match self {
            Provider::Content => "yoto-creator.content",
            Provider::Generation => "yoto-creator.generation",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Content => write!(f, "content"),
            Provider::Generation => write!(f, "generation"),
        }
    }
}

/// Secret Store Port
///
/// 按 Provider 的资源名存取不透明的 key
#[async_trait]
pub trait SecretStorePort: Send + Sync {
    /// 保存 key（替换已有值）
    async fn put(&self, provider: Provider, secret: &str) -> Result<(), SecretStoreError>;

    /// 读取当前 key
    async fn get(&self, provider: Provider) -> Result<Option<String>, SecretStoreError>;

    /// 删除 key（不存在时也返回成功）
    async fn delete(&self, provider: Provider) -> Result<(), SecretStoreError>;

    /// 是否存有 key
    async fn has(&self, provider: Provider) -> Result<bool, SecretStoreError> {
        Ok(self.get(provider).await?.is_some())
    }
}
