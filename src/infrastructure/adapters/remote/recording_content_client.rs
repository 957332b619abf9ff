//! Recording Content Client - 不访问网络的内容服务客户端
//!
//! 记录每一次调用，容器保存在内存中；可注入创建失败或第 N 次上传失败。
//! 用于 --dry-run 与测试。

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::application::ports::{
    AssetUpload, ContainerMeta, RemoteContent, RemoteContentPort, RemoteError,
};
use crate::domain::content::{AssetKind, ContainerId};

/// 一次被记录的调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Authenticate,
    CreateContainer {
        title: String,
        language: String,
    },
    UploadAsset {
        container_id: ContainerId,
        kind: AssetKind,
        file_name: String,
        content_type: String,
        size: usize,
    },
    GetContainer(ContainerId),
    DeleteContainer(ContainerId),
}

/// Recording Content Client
pub struct RecordingContentClient {
    authenticated: AtomicBool,
    calls: Mutex<Vec<RecordedCall>>,
    containers: DashMap<ContainerId, RemoteContent>,
    fail_create: bool,
    /// 从 0 开始计数的上传尝试序号
    fail_upload_at: Option<usize>,
    upload_attempts: AtomicUsize,
}

impl RecordingContentClient {
    /// 已认证的客户端
    pub fn new() -> Self {
        Self {
            authenticated: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
            containers: DashMap::new(),
            fail_create: false,
            fail_upload_at: None,
            upload_attempts: AtomicUsize::new(0),
        }
    }

    /// 未认证的客户端
    pub fn unauthenticated() -> Self {
        let client = Self::new();
        client.authenticated.store(false, Ordering::SeqCst);
        client
    }

    /// 容器创建总是失败
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// 第 index 次上传（从 0 开始）失败
    pub fn failing_upload_at(mut self, index: usize) -> Self {
        self.fail_upload_at = Some(index);
        self
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 到目前为止的全部调用
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_calls().clone()
    }

    /// 只看上传调用
    pub fn uploads(&self) -> Vec<RecordedCall> {
        self.lock_calls()
            .iter()
            .filter(|call| matches!(call, RecordedCall::UploadAsset { .. }))
            .cloned()
            .collect()
    }

    /// 上传过的文件名（按调用顺序）
    pub fn uploaded_file_names(&self) -> Vec<String> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::UploadAsset { file_name, .. } => Some(file_name.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_authenticated(&self) -> Result<(), RemoteError> {
        if self.authenticated.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RemoteError::NotAuthenticated)
        }
    }

    fn not_found(container_id: &ContainerId) -> RemoteError {
        RemoteError::ServiceError {
            status: 404,
            message: format!("content {} not found", container_id),
        }
    }
}

impl Default for RecordingContentClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteContentPort for RecordingContentClient {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn authenticate(&self, api_key: &str) -> Result<(), RemoteError> {
        if api_key.trim().is_empty() {
            return Err(RemoteError::AuthenticationRejected(
                "API key is blank".to_string(),
            ));
        }
        self.record(RecordedCall::Authenticate);
        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create_container(&self, meta: &ContainerMeta) -> Result<ContainerId, RemoteError> {
        self.record(RecordedCall::CreateContainer {
            title: meta.title.clone(),
            language: meta.language.clone(),
        });
        self.ensure_authenticated()?;

        if self.fail_create {
            return Err(RemoteError::ServiceError {
                status: 500,
                message: "injected container failure".to_string(),
            });
        }

        let id = ContainerId::new(Uuid::new_v4().to_string());
        let now = Utc::now();
        self.containers.insert(
            id.clone(),
            RemoteContent {
                id: id.clone(),
                title: meta.title.clone(),
                description: meta.description.clone(),
                created_at: Some(now),
                updated_at: Some(now),
            },
        );

        tracing::debug!(container_id = %id, title = %meta.title, "Recorded container creation");
        Ok(id)
    }

    async fn upload_asset(
        &self,
        container_id: &ContainerId,
        upload: AssetUpload,
    ) -> Result<(), RemoteError> {
        self.record(RecordedCall::UploadAsset {
            container_id: container_id.clone(),
            kind: upload.kind,
            file_name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            size: upload.data.len(),
        });
        self.ensure_authenticated()?;

        let attempt = self.upload_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload_at == Some(attempt) {
            return Err(RemoteError::ServiceError {
                status: 500,
                message: format!("injected failure on upload #{}", attempt),
            });
        }

        match self.containers.get_mut(container_id) {
            Some(mut content) => {
                content.updated_at = Some(Utc::now());
                Ok(())
            }
            None => Err(Self::not_found(container_id)),
        }
    }

    async fn get_container(&self, container_id: &ContainerId) -> Result<RemoteContent, RemoteError> {
        self.record(RecordedCall::GetContainer(container_id.clone()));
        self.ensure_authenticated()?;

        self.containers
            .get(container_id)
            .map(|content| content.clone())
            .ok_or_else(|| Self::not_found(container_id))
    }

    async fn delete_container(&self, container_id: &ContainerId) -> Result<(), RemoteError> {
        self.record(RecordedCall::DeleteContainer(container_id.clone()));
        self.ensure_authenticated()?;

        self.containers
            .remove(container_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(container_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ContainerMeta {
        ContainerMeta {
            title: "t".to_string(),
            description: None,
            language: "en".to_string(),
        }
    }

    fn upload(name: &str) -> AssetUpload {
        AssetUpload {
            kind: AssetKind::Audio,
            file_name: name.to_string(),
            content_type: "audio/mpeg".to_string(),
            data: vec![0; 4],
        }
    }

    #[tokio::test]
    async fn test_injected_upload_failure_is_counted_from_zero() {
        let client = RecordingContentClient::new().failing_upload_at(1);
        let id = client.create_container(&meta()).await.unwrap();

        assert!(client.upload_asset(&id, upload("a.mp3")).await.is_ok());
        assert!(client.upload_asset(&id, upload("b.mp3")).await.is_err());
        assert!(client.upload_asset(&id, upload("c.mp3")).await.is_ok());
        assert_eq!(client.uploaded_file_names(), vec!["a.mp3", "b.mp3", "c.mp3"]);
    }

    #[tokio::test]
    async fn test_blank_key_rejected() {
        let client = RecordingContentClient::unauthenticated();
        assert!(matches!(
            client.authenticate("  ").await,
            Err(RemoteError::AuthenticationRejected(_))
        ));
        assert!(!client.is_authenticated());

        client.authenticate("key").await.unwrap();
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn test_get_and_delete_container() {
        let client = RecordingContentClient::new();
        let id = client.create_container(&meta()).await.unwrap();

        let content = client.get_container(&id).await.unwrap();
        assert_eq!(content.title, "t");
        assert!(content.created_at.is_some());

        client.delete_container(&id).await.unwrap();
        assert!(matches!(
            client.get_container(&id).await,
            Err(RemoteError::ServiceError { status: 404, .. })
        ));
    }
}
