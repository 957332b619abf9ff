//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod content_queries;

pub mod handlers;

pub use content_queries::*;
