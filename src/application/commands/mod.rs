//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod artwork_commands;
mod content_commands;
mod credential_commands;
mod import_commands;

pub mod handlers;

pub use artwork_commands::*;
pub use content_commands::*;
pub use credential_commands::*;
pub use import_commands::*;
