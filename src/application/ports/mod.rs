//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_source;
mod image_generator;
mod remote_content;
mod secret_store;

pub use audio_source::{AudioFileInfo, AudioSourceError, AudioSourcePort};
pub use image_generator::{GenerationError, ImageGeneratorPort};
pub use remote_content::{AssetUpload, ContainerMeta, RemoteContent, RemoteContentPort, RemoteError};
pub use secret_store::{Provider, SecretStoreError, SecretStorePort};
