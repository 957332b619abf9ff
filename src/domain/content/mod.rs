//! Content Context - 发布内容限界上下文
//!
//! 职责:
//! - Content 聚合（平铺模式 / 章节模式）
//! - Chapter、AudioTrack 实体及其显式排序
//! - 发布前校验
//! - 上传计划（确定性的远端调用顺序）

mod aggregate;
mod entities;
mod errors;
mod upload_plan;
mod validation;
mod value_objects;

pub use aggregate::{Content, ContentBody};
pub use entities::{AudioTrack, Chapter};
pub use errors::ContentError;
pub use upload_plan::{AssetPayload, PlannedUpload, UploadPlan, UploadStep};
pub use validation::{validate_for_publish, ValidationErrors, Violation};
pub use value_objects::{ArtworkTarget, AssetKind, AudioFormat, ContainerId, SourceLocator};
