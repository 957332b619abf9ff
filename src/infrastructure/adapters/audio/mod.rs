//! Audio Source Adapter - 本地音频文件来源实现

mod file_audio_source;
mod memory_audio_source;

pub use file_audio_source::{probe_duration, FileAudioSource};
pub use memory_audio_source::InMemoryAudioSource;
