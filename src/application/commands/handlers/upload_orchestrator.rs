//! Upload Orchestrator - 发布流程编排
//!
//! 把一个已校验的 Content 转换为确定顺序的远端调用：
//! 创建容器 → 图标 → 封面 → 章节（章节图标 → 轨道）或平铺轨道。
//!
//! 每一步严格串行，第一个失败即中止，已创建的容器不回滚。
//! 取消信号只在开始下一步之前检查，不会打断正在进行的传输。

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::error::PublishError;
use crate::application::ports::{AssetUpload, AudioSourcePort, ContainerMeta, RemoteContentPort};
use crate::domain::content::{
    validate_for_publish, AssetPayload, AudioFormat, ContainerId, Content, PlannedUpload,
    UploadPlan, UploadStep,
};

/// 创建容器时使用的默认语言
pub const DEFAULT_LANGUAGE: &str = "en";

const IMAGE_CONTENT_TYPE: &str = "image/png";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Upload Orchestrator
///
/// 除注入的端口外不持有任何状态，可同时为多个 Content 并发发布。
pub struct UploadOrchestrator {
    remote: Arc<dyn RemoteContentPort>,
    audio_source: Arc<dyn AudioSourcePort>,
    language: String,
}

impl UploadOrchestrator {
    pub fn new(remote: Arc<dyn RemoteContentPort>, audio_source: Arc<dyn AudioSourcePort>) -> Self {
        Self {
            remote,
            audio_source,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// 发布内容，成功时返回远端容器 ID
    pub async fn publish(
        &self,
        content: &Content,
        cancel: &CancellationToken,
    ) -> Result<ContainerId, PublishError> {
        let plan = self.prepare(content)?;

        if cancel.is_cancelled() {
            tracing::warn!(title = %content.title(), "Publish cancelled before container creation");
            return Err(PublishError::Cancelled { container_id: None });
        }

        let meta = ContainerMeta {
            title: content.title().to_string(),
            description: content.description().map(str::to_string),
            language: self.language.clone(),
        };

        let container_id = self.remote.create_container(&meta).await.map_err(|e| {
            tracing::error!(title = %meta.title, error = %e, "Container creation failed");
            PublishError::ContainerCreationFailed(e)
        })?;

        tracing::info!(
            container_id = %container_id,
            title = %meta.title,
            steps = plan.len(),
            "Container created"
        );

        self.execute(&container_id, plan.uploads(), cancel).await?;

        tracing::info!(
            container_id = %container_id,
            tracks = content.track_count(),
            "Content published"
        );

        Ok(container_id)
    }

    /// 对已存在的容器从指定步骤（含）续传
    ///
    /// 用于 AssetUploadFailed 之后只重试失败步骤及其后被跳过的部分。
    pub async fn resume(
        &self,
        container_id: &ContainerId,
        content: &Content,
        from: &UploadStep,
        cancel: &CancellationToken,
    ) -> Result<usize, PublishError> {
        let plan = self.prepare(content)?;
        let remaining = plan
            .remaining_from(from)
            .ok_or(PublishError::UnknownStep(*from))?;

        tracing::info!(
            container_id = %container_id,
            from = %from,
            steps = remaining.len(),
            "Resuming publish"
        );

        self.execute(container_id, remaining, cancel).await?;
        Ok(remaining.len())
    }

    /// 认证与校验，全部通过后才构建上传计划
    fn prepare<'a>(&self, content: &'a Content) -> Result<UploadPlan<'a>, PublishError> {
        if !self.remote.is_authenticated() {
            return Err(PublishError::NotAuthenticated);
        }

        validate_for_publish(content).map_err(|e| {
            tracing::warn!(title = %content.title(), violations = %e, "Content rejected");
            PublishError::Validation(e)
        })?;

        Ok(UploadPlan::for_content(content))
    }

    async fn execute(
        &self,
        container_id: &ContainerId,
        uploads: &[PlannedUpload<'_>],
        cancel: &CancellationToken,
    ) -> Result<(), PublishError> {
        let total = uploads.len();

        for (index, planned) in uploads.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    container_id = %container_id,
                    next_step = %planned.step,
                    "Publish cancelled"
                );
                return Err(PublishError::Cancelled {
                    container_id: Some(container_id.clone()),
                });
            }

            let fail = |cause: String| {
                tracing::error!(
                    container_id = %container_id,
                    step = %planned.step,
                    error = %cause,
                    "Asset upload failed"
                );
                PublishError::AssetUploadFailed {
                    container_id: container_id.clone(),
                    step: planned.step,
                    cause,
                }
            };

            let upload = self.load(planned).await.map_err(&fail)?;
            let size = upload.data.len();

            self.remote
                .upload_asset(container_id, upload)
                .await
                .map_err(|e| fail(e.to_string()))?;

            tracing::debug!(
                container_id = %container_id,
                step = %planned.step,
                size = size,
                progress = %format!("{}/{}", index + 1, total),
                "Asset uploaded"
            );
        }

        Ok(())
    }

    /// 准备一次上传的字节：图片直接取内存数据，音频在此时重新读取
    async fn load(&self, planned: &PlannedUpload<'_>) -> Result<AssetUpload, String> {
        let file_name = planned.file_name();

        match planned.payload {
            AssetPayload::Image(bytes) => Ok(AssetUpload {
                kind: planned.step.kind,
                file_name,
                content_type: IMAGE_CONTENT_TYPE.to_string(),
                data: bytes.to_vec(),
            }),
            AssetPayload::Track(track) => {
                let data = self
                    .audio_source
                    .read(track.source())
                    .await
                    .map_err(|e| e.to_string())?;
                let content_type = AudioFormat::from_file_name(track.file_name())
                    .map(|format| format.mime_type())
                    .unwrap_or(FALLBACK_CONTENT_TYPE);

                Ok(AssetUpload {
                    kind: planned.step.kind,
                    file_name,
                    content_type: content_type.to_string(),
                    data,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{AssetKind, AudioTrack, Chapter, SourceLocator, Violation};
    use crate::infrastructure::adapters::{
        InMemoryAudioSource, RecordedCall, RecordingContentClient,
    };

    fn track(source: &InMemoryAudioSource, name: &str, order: u32) -> AudioTrack {
        let path = format!("/music/{}", name);
        source.insert(path.as_str(), name.as_bytes().to_vec(), Some(10.0));
        AudioTrack::new(name, SourceLocator::from(path.as_str()), name.len() as u64)
            .with_order(order)
    }

    fn setup(
        remote: RecordingContentClient,
    ) -> (Arc<RecordingContentClient>, Arc<InMemoryAudioSource>) {
        (Arc::new(remote), Arc::new(InMemoryAudioSource::new()))
    }

    fn orchestrator(
        remote: &Arc<RecordingContentClient>,
        source: &Arc<InMemoryAudioSource>,
    ) -> UploadOrchestrator {
        UploadOrchestrator::new(remote.clone(), source.clone())
    }

    fn five_track_content(source: &InMemoryAudioSource) -> Content {
        let tracks = (0..5)
            .map(|i| track(source, &format!("t{}.mp3", i), i))
            .collect();
        Content::flat("五首", tracks)
    }

    #[tokio::test]
    async fn test_publish_full_sequence() {
        let (remote, source) = setup(RecordingContentClient::new());
        let mut chapter = Chapter::new("第一章")
            .unwrap()
            .with_tracks(vec![track(&source, "a.mp3", 0)]);
        chapter.set_icon(Some(vec![1]));
        let mut content = Content::chaptered("故事", vec![chapter])
            .with_description(Some("描述".to_string()));
        content.set_icon(Some(vec![2]));
        content.set_cover(Some(vec![3]));

        let id = orchestrator(&remote, &source)
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap();

        let calls = remote.calls();
        assert_eq!(
            calls[0],
            RecordedCall::CreateContainer {
                title: "故事".to_string(),
                language: "en".to_string(),
            }
        );
        assert_eq!(
            remote.uploaded_file_names(),
            vec!["icon.png", "cover.png", "chapter_0_icon.png", "a.mp3"]
        );
        match &calls[4] {
            RecordedCall::UploadAsset {
                container_id,
                kind,
                content_type,
                size,
                ..
            } => {
                assert_eq!(container_id, &id);
                assert_eq!(*kind, AssetKind::Audio);
                assert_eq!(content_type, "audio/mpeg");
                assert_eq!(*size, "a.mp3".len());
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_third_of_five_failures_stops_sequence() {
        let (remote, source) = setup(RecordingContentClient::new().failing_upload_at(2));
        let content = five_track_content(&source);

        let err = orchestrator(&remote, &source)
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(UploadStep::track(2)));
        assert!(err.container_id().is_some());
        assert_eq!(
            remote.uploaded_file_names(),
            vec!["t0.mp3", "t1.mp3", "t2.mp3"]
        );
    }

    #[tokio::test]
    async fn test_upload_order_ignores_list_position() {
        let (remote, source) = setup(RecordingContentClient::new());
        let late = Chapter::new("后")
            .unwrap()
            .with_tracks(vec![track(&source, "d.mp3", 1), track(&source, "c.mp3", 0)])
            .with_order(1);
        let early = Chapter::new("前")
            .unwrap()
            .with_tracks(vec![track(&source, "b.mp3", 1), track(&source, "a.mp3", 0)])
            .with_order(0);
        let content = Content::chaptered("乱序", vec![late, early]);

        orchestrator(&remote, &source)
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            remote.uploaded_file_names(),
            vec!["a.mp3", "b.mp3", "c.mp3", "d.mp3"]
        );
    }

    #[tokio::test]
    async fn test_invalid_content_makes_no_calls() {
        let (remote, source) = setup(RecordingContentClient::new());
        let content = Content::new(" ");

        let err = orchestrator(&remote, &source)
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            PublishError::Validation(errors) => {
                assert!(errors.contains(&Violation::MissingTitle));
                assert!(errors.contains(&Violation::NoAudio));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_colliding_chapter_orders_rejected_before_upload() {
        let (remote, source) = setup(RecordingContentClient::new().failing_upload_at(1));
        let first = Chapter::new("A")
            .unwrap()
            .with_tracks(vec![track(&source, "a.mp3", 0)]);
        let second = Chapter::new("B")
            .unwrap()
            .with_tracks(vec![track(&source, "b.mp3", 0)]);
        let content = Content::chaptered("重复", vec![first, second]);

        let err = orchestrator(&remote, &source)
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            PublishError::Validation(errors) => {
                assert_eq!(
                    errors.violations(),
                    &[Violation::DuplicateChapterOrder(vec![0])]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let resumed = orchestrator(&remote, &source)
            .resume(
                &ContainerId::new("c-1"),
                &content,
                &UploadStep::chapter_track(0, 0),
                &CancellationToken::new(),
            )
            .await;
        assert!(matches!(resumed, Err(PublishError::Validation(_))));
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_makes_no_calls() {
        let (remote, source) = setup(RecordingContentClient::unauthenticated());
        let content = five_track_content(&source);

        let err = orchestrator(&remote, &source)
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::NotAuthenticated));
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_container_failure_uploads_nothing() {
        let (remote, source) = setup(RecordingContentClient::new().failing_create());
        let content = five_track_content(&source);

        let err = orchestrator(&remote, &source)
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::ContainerCreationFailed(_)));
        assert!(err.container_id().is_none());
        assert!(remote.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_missing_audio_file_fails_its_step() {
        let (remote, source) = setup(RecordingContentClient::new());
        let content = five_track_content(&source);
        source.remove(std::path::Path::new("/music/t1.mp3"));

        let err = orchestrator(&remote, &source)
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(UploadStep::track(1)));
        assert_eq!(remote.uploaded_file_names(), vec!["t0.mp3"]);
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let (remote, source) = setup(RecordingContentClient::new());
        let content = five_track_content(&source);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = orchestrator(&remote, &source)
            .publish(&content, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Cancelled { container_id: None }));
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_midway_keeps_container_id() {
        let (remote, source) = setup(RecordingContentClient::new());
        let content = five_track_content(&source);
        let orchestrator = orchestrator(&remote, &source);
        let cancel = CancellationToken::new();

        let plan = UploadPlan::for_content(&content);
        let container_id = remote
            .create_container(&ContainerMeta {
                title: "五首".to_string(),
                description: None,
                language: "en".to_string(),
            })
            .await
            .unwrap();
        orchestrator
            .execute(&container_id, &plan.uploads()[..2], &cancel)
            .await
            .unwrap();

        cancel.cancel();
        let err = orchestrator
            .execute(&container_id, &plan.uploads()[2..], &cancel)
            .await
            .unwrap_err();

        assert_eq!(err.container_id(), Some(&container_id));
        assert_eq!(remote.uploaded_file_names(), vec!["t0.mp3", "t1.mp3"]);
    }

    #[tokio::test]
    async fn test_resume_from_failed_step() {
        let (remote, source) = setup(RecordingContentClient::new().failing_upload_at(2));
        let content = five_track_content(&source);
        let orchestrator = orchestrator(&remote, &source);
        let cancel = CancellationToken::new();

        let err = orchestrator.publish(&content, &cancel).await.unwrap_err();
        let container_id = err.container_id().cloned().unwrap();
        let step = err.failed_step().unwrap();

        let resumed = orchestrator
            .resume(&container_id, &content, &step, &cancel)
            .await
            .unwrap();

        assert_eq!(resumed, 3);
        assert_eq!(
            remote.uploaded_file_names(),
            vec!["t0.mp3", "t1.mp3", "t2.mp3", "t2.mp3", "t3.mp3", "t4.mp3"]
        );
        assert_eq!(
            remote
                .calls()
                .iter()
                .filter(|c| matches!(c, RecordedCall::CreateContainer { .. }))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_resume_unknown_step() {
        let (remote, source) = setup(RecordingContentClient::new());
        let content = five_track_content(&source);

        let err = orchestrator(&remote, &source)
            .resume(
                &ContainerId::new("c"),
                &content,
                &UploadStep::chapter_track(0, 0),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::UnknownStep(_)));
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_custom_language() {
        let (remote, source) = setup(RecordingContentClient::new());
        let content = five_track_content(&source);

        orchestrator(&remote, &source)
            .with_language("fr")
            .publish(&content, &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(
            &remote.calls()[0],
            RecordedCall::CreateContainer { language, .. } if language == "fr"
        ));
    }
}
