//! 应用层错误定义
//!
//! 统一的命令/查询错误类型，以及发布流程专用的 PublishError

use thiserror::Error;

use crate::application::ports::{
    AudioSourceError, GenerationError, RemoteError, SecretStoreError,
};
use crate::domain::content::{ContainerId, ContentError, UploadStep, ValidationErrors};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 未认证
    #[error("Not authenticated: {0}")]
    NotAuthenticated(&'static str),

    /// 认证失败
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RemoteError> for ApplicationError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotAuthenticated => Self::NotAuthenticated("content"),
            RemoteError::AuthenticationRejected(message) => Self::AuthenticationFailed(message),
            RemoteError::InvalidRequest(message) => Self::ValidationError(message),
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}

impl From<GenerationError> for ApplicationError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::NotAuthenticated => Self::NotAuthenticated("generation"),
            GenerationError::AuthenticationRejected(message) => {
                Self::AuthenticationFailed(message)
            }
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}

impl From<SecretStoreError> for ApplicationError {
    fn from(err: SecretStoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<AudioSourceError> for ApplicationError {
    fn from(err: AudioSourceError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<ContentError> for ApplicationError {
    fn from(err: ContentError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ValidationErrors> for ApplicationError {
    fn from(err: ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

/// 发布错误
///
/// 远端调用失败时保留失败步骤（资源类型 + 章节/轨道 order），
/// 容器已创建时同时带回容器 ID，调用方据此只重试缺失部分。
#[derive(Debug, Error)]
pub enum PublishError {
    /// 发布前校验失败，没有发起任何网络请求
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// 远端客户端未认证，没有发起任何网络请求
    #[error("Not authenticated")]
    NotAuthenticated,

    /// 容器创建失败，远端不存在任何内容，可整体重试
    #[error("Container creation failed: {0}")]
    ContainerCreationFailed(#[source] RemoteError),

    /// 资源上传失败，容器已存在且只上传了部分资源
    #[error("Upload of {step} failed for container {container_id}: {cause}")]
    AssetUploadFailed {
        container_id: ContainerId,
        step: UploadStep,
        cause: String,
    },

    /// 在开始下一步之前收到取消信号
    #[error("Publish cancelled")]
    Cancelled { container_id: Option<ContainerId> },

    /// 续传的起始步骤不在上传计划中
    #[error("Step {0} is not part of the upload plan")]
    UnknownStep(UploadStep),
}

impl PublishError {
    /// 已创建的远端容器 ID（如有）
    pub fn container_id(&self) -> Option<&ContainerId> {
        match self {
            Self::AssetUploadFailed { container_id, .. } => Some(container_id),
            Self::Cancelled { container_id } => container_id.as_ref(),
            _ => None,
        }
    }

    /// 失败的上传步骤（如有）
    pub fn failed_step(&self) -> Option<UploadStep> {
        match self {
            Self::AssetUploadFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_failure_exposes_container_and_step() {
        let err = PublishError::AssetUploadFailed {
            container_id: ContainerId::new("c-1"),
            step: UploadStep::track(2),
            cause: "boom".to_string(),
        };
        assert_eq!(err.container_id().map(|id| id.as_str()), Some("c-1"));
        assert_eq!(err.failed_step(), Some(UploadStep::track(2)));
        assert_eq!(
            err.to_string(),
            "Upload of track 2 failed for container c-1: boom"
        );
    }

    #[test]
    fn test_container_failure_has_no_container() {
        let err = PublishError::ContainerCreationFailed(RemoteError::Timeout);
        assert!(err.container_id().is_none());
        assert!(err.failed_step().is_none());
    }

    #[test]
    fn test_remote_not_authenticated_maps_to_application_error() {
        let err: ApplicationError = RemoteError::NotAuthenticated.into();
        assert!(matches!(err, ApplicationError::NotAuthenticated("content")));
    }
}
