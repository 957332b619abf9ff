//! Content Commands - 发布、续传、删除

use tokio_util::sync::CancellationToken;

use crate::domain::content::{ContainerId, Content, UploadStep};

/// 发布内容命令
#[derive(Debug, Clone)]
pub struct PublishContent {
    pub content: Content,
    /// 取消信号：只在开始下一步之前检查
    pub cancel: CancellationToken,
}

/// 从指定步骤续传命令（容器已存在）
#[derive(Debug, Clone)]
pub struct ResumePublish {
    pub container_id: ContainerId,
    pub content: Content,
    pub from_step: UploadStep,
    pub cancel: CancellationToken,
}

/// 删除远端内容命令
#[derive(Debug, Clone)]
pub struct DeleteContent {
    pub container_id: ContainerId,
}
