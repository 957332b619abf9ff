//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（RemoteContent、ImageGenerator、SecretStore、AudioSource）
//! - commands: CQRS 命令及处理器（发布编排在 UploadOrchestrator）
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Artwork commands
    GenerateArtwork,
    // Content commands
    DeleteContent,
    PublishContent,
    ResumePublish,
    // Credential commands
    Authenticate,
    ForgetCredential,
    // Import commands
    ImportTracks,
    // Handlers
    handlers::{
        AuthenticateHandler, AuthenticateResponse, DeleteContentHandler, ForgetCredentialHandler,
        GenerateArtworkHandler, GenerateArtworkResponse, ImportTracksHandler,
        ImportTracksResponse, PublishContentHandler, PublishContentResponse,
        ResumePublishHandler, ResumePublishResponse, UploadOrchestrator, DEFAULT_LANGUAGE,
    },
};

pub use error::{ApplicationError, PublishError};

pub use ports::{
    // Audio source
    AudioFileInfo,
    AudioSourceError,
    AudioSourcePort,
    // Image generator
    GenerationError,
    ImageGeneratorPort,
    // Remote content
    AssetUpload,
    ContainerMeta,
    RemoteContent,
    RemoteContentPort,
    RemoteError,
    // Secret store
    Provider,
    SecretStoreError,
    SecretStorePort,
};

pub use queries::{handlers::GetContentHandler, GetContent};
