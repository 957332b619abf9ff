//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 内容服务配置
    #[serde(default)]
    pub remote: RemoteConfig,

    /// 图片生成服务配置
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 密钥存储配置
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 内容服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// 服务基础 URL
    #[serde(default = "default_remote_url")]
    pub base_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,

    /// 创建容器时的语言
    #[serde(default = "default_language")]
    pub language: String,

    /// API key；未设置时从密钥存储读取
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_remote_url() -> String {
    "https://api.yotoplay.com/v1".to_string()
}

fn default_remote_timeout() -> u64 {
    300
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_remote_url(),
            timeout_secs: default_remote_timeout(),
            language: default_language(),
            api_key: None,
        }
    }
}

/// 图片生成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 服务基础 URL
    #[serde(default = "default_generation_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_quality")]
    pub quality: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,

    /// API key；未设置时从密钥存储读取
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_generation_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "dall-e-3".to_string()
}

fn default_quality() -> String {
    "standard".to_string()
}

fn default_generation_timeout() -> u64 {
    120
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_url(),
            model: default_model(),
            quality: default_quality(),
            timeout_secs: default_generation_timeout(),
            api_key: None,
        }
    }
}

/// 密钥存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct SecretsConfig {
    /// JSON 文件路径
    #[serde(default = "default_secrets_path")]
    pub path: PathBuf,
}

fn default_secrets_path() -> PathBuf {
    PathBuf::from("data/secrets.json")
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            path: default_secrets_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.remote.base_url, "https://api.yotoplay.com/v1");
        assert_eq!(config.remote.language, "en");
        assert_eq!(config.generation.model, "dall-e-3");
        assert_eq!(config.secrets.path, PathBuf::from("data/secrets.json"));
        assert!(config.remote.api_key.is_none());
    }
}
