//! Import Commands

use std::path::PathBuf;

/// 导入本地音频文件命令
#[derive(Debug, Clone)]
pub struct ImportTracks {
    pub paths: Vec<PathBuf>,
    /// 第一条导入轨道的 order（接在已有兄弟轨道之后）
    pub first_order: u32,
}
