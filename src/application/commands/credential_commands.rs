//! Credential Commands

use crate::application::ports::Provider;

/// 认证命令
///
/// 未提供 api_key 时从密钥存储读取
#[derive(Debug, Clone)]
pub struct Authenticate {
    pub provider: Provider,
    pub api_key: Option<String>,
    /// 认证成功后保存显式提供的 key
    pub remember: bool,
}

/// 删除已保存的 key
#[derive(Debug, Clone)]
pub struct ForgetCredential {
    pub provider: Provider,
}
