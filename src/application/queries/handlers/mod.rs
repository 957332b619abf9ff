//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod content_handlers;

pub use content_handlers::*;
