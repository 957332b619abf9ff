//! Remote Content Adapter - 内容服务客户端实现

mod http_content_client;
mod recording_content_client;

pub use http_content_client::*;
pub use recording_content_client::{RecordedCall, RecordingContentClient};
