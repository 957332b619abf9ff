//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现，以及发布清单的读取

pub mod adapters;
pub mod manifest;

pub use manifest::{assemble, assemble_for_resume, ContentManifest, ManifestError};
