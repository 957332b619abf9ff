//! Yoto Creator - 有声内容组装与发布
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Content Context: 内容、章节、音频轨道，显式排序，发布校验，上传计划
//!
//! 应用层 (application/):
//! - Ports: 端口定义（RemoteContent, ImageGenerator, SecretStore, AudioSource）
//! - Commands: CQRS 命令处理器，UploadOrchestrator 负责发布编排
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP 内容服务客户端、HTTP 图片生成客户端、密钥存储、本地音频文件
//! - Manifest: TOML 发布清单

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
