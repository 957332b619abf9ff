//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod artwork_handlers;
mod content_handlers;
mod credential_handlers;
mod import_handlers;
mod upload_orchestrator;

pub use artwork_handlers::*;
pub use content_handlers::*;
pub use credential_handlers::*;
pub use import_handlers::*;
pub use upload_orchestrator::*;
