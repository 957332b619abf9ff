//! Content Command Handlers - 发布、续传、删除

use std::sync::Arc;

use crate::application::commands::{DeleteContent, PublishContent, ResumePublish};
use crate::application::error::{ApplicationError, PublishError};
use crate::application::ports::RemoteContentPort;
use crate::domain::content::{ContainerId, UploadPlan};
use crate::domain::{format_duration, humanize_size};

use super::UploadOrchestrator;

// ============================================================================
// PublishContent
// ============================================================================

/// 发布响应
#[derive(Debug, Clone)]
pub struct PublishContentResponse {
    pub container_id: ContainerId,
    /// 上传的资源数（图片 + 音频）
    pub uploaded_assets: usize,
    pub track_count: usize,
    /// 例如 "12:34"
    pub total_duration: String,
    /// 例如 "1.50 MB"
    pub total_size: String,
}

/// PublishContent Handler
pub struct PublishContentHandler {
    orchestrator: Arc<UploadOrchestrator>,
}

impl PublishContentHandler {
    pub fn new(orchestrator: Arc<UploadOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn handle(&self, command: PublishContent) -> Result<PublishContentResponse, PublishError> {
        let content = &command.content;

        tracing::info!(
            title = %content.title(),
            tracks = content.track_count(),
            size = %humanize_size(content.total_size()),
            "Publishing content"
        );

        let container_id = self.orchestrator.publish(content, &command.cancel).await?;

        Ok(PublishContentResponse {
            container_id,
            uploaded_assets: UploadPlan::for_content(content).len(),
            track_count: content.track_count(),
            total_duration: format_duration(content.total_duration()),
            total_size: humanize_size(content.total_size()),
        })
    }
}

// ============================================================================
// ResumePublish
// ============================================================================

/// 续传响应
#[derive(Debug, Clone)]
pub struct ResumePublishResponse {
    pub container_id: ContainerId,
    pub uploaded_assets: usize,
}

/// ResumePublish Handler
pub struct ResumePublishHandler {
    orchestrator: Arc<UploadOrchestrator>,
}

impl ResumePublishHandler {
    pub fn new(orchestrator: Arc<UploadOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn handle(&self, command: ResumePublish) -> Result<ResumePublishResponse, PublishError> {
        let uploaded_assets = self
            .orchestrator
            .resume(
                &command.container_id,
                &command.content,
                &command.from_step,
                &command.cancel,
            )
            .await?;

        tracing::info!(
            container_id = %command.container_id,
            uploaded_assets = uploaded_assets,
            "Resume completed"
        );

        Ok(ResumePublishResponse {
            container_id: command.container_id,
            uploaded_assets,
        })
    }
}

// ============================================================================
// DeleteContent
// ============================================================================

/// DeleteContent Handler
pub struct DeleteContentHandler {
    remote: Arc<dyn RemoteContentPort>,
}

impl DeleteContentHandler {
    pub fn new(remote: Arc<dyn RemoteContentPort>) -> Self {
        Self { remote }
    }

    pub async fn handle(&self, command: DeleteContent) -> Result<(), ApplicationError> {
        if !self.remote.is_authenticated() {
            return Err(ApplicationError::NotAuthenticated("content"));
        }

        self.remote.delete_container(&command.container_id).await?;

        tracing::info!(container_id = %command.container_id, "Content deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{AudioTrack, Content, SourceLocator};
    use crate::infrastructure::adapters::{InMemoryAudioSource, RecordingContentClient};
    use tokio_util::sync::CancellationToken;

    fn content(source: &InMemoryAudioSource) -> Content {
        source.insert("/a.mp3", vec![0; 1536], Some(65.0));
        Content::flat(
            "标题",
            vec![AudioTrack::new("a.mp3", SourceLocator::from("/a.mp3"), 1536).with_duration(Some(65.0))],
        )
    }

    #[tokio::test]
    async fn test_publish_response_summary() {
        let remote = Arc::new(RecordingContentClient::new());
        let source = Arc::new(InMemoryAudioSource::new());
        let handler = PublishContentHandler::new(Arc::new(UploadOrchestrator::new(
            remote.clone(),
            source.clone(),
        )));

        let response = handler
            .handle(PublishContent {
                content: content(&source),
                cancel: CancellationToken::new(),
            })
            .await
            .unwrap();

        assert_eq!(response.uploaded_assets, 1);
        assert_eq!(response.track_count, 1);
        assert_eq!(response.total_duration, "01:05");
        assert_eq!(response.total_size, "1.50 KB");
    }

    #[tokio::test]
    async fn test_delete_requires_authentication() {
        let handler = DeleteContentHandler::new(Arc::new(RecordingContentClient::unauthenticated()));
        let err = handler
            .handle(DeleteContent {
                container_id: ContainerId::new("c"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotAuthenticated(_)));
    }
}
