//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Content Context: 待发布的有声内容（章节、音频轨道、图标与封面）

pub mod content;

mod ordering;
mod summary;

pub use ordering::{renumber, sorted_by_order, Ordered};
pub use summary::{format_duration, humanize_size, parse_duration, total_duration, total_size};
