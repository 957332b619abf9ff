//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `YOTO_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `YOTO_REMOTE__BASE_URL=https://api.example.com/v1`
/// - `YOTO_REMOTE__API_KEY=...`
/// - `YOTO_GENERATION__MODEL=dall-e-3`
/// - `YOTO_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("remote.base_url", "https://api.yotoplay.com/v1")?
        .set_default("remote.timeout_secs", 300)?
        .set_default("remote.language", "en")?
        .set_default("generation.base_url", "https://api.openai.com/v1")?
        .set_default("generation.model", "dall-e-3")?
        .set_default("generation.quality", "standard")?
        .set_default("generation.timeout_secs", 120)?
        .set_default("secrets.path", "data/secrets.json")?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: YOTO_REMOTE__TIMEOUT_SECS=600
    builder = builder.add_source(
        Environment::with_prefix("YOTO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.remote.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Remote base URL cannot be empty".to_string(),
        ));
    }

    if config.generation.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Generation base URL cannot be empty".to_string(),
        ));
    }

    if config.remote.timeout_secs == 0 || config.generation.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Timeouts cannot be 0".to_string(),
        ));
    }

    if config.remote.language.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志，从不输出 API key）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Remote URL: {}", config.remote.base_url);
    tracing::info!("Remote Timeout: {}s", config.remote.timeout_secs);
    tracing::info!("Language: {}", config.remote.language);
    tracing::info!("Remote API Key: {}", key_status(&config.remote.api_key));
    tracing::info!("Generation URL: {}", config.generation.base_url);
    tracing::info!("Generation Model: {}", config.generation.model);
    tracing::info!("Generation API Key: {}", key_status(&config.generation.api_key));
    tracing::info!("Secrets File: {:?}", config.secrets.path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

fn key_status(key: &Option<String>) -> &'static str {
    match key {
        Some(k) if !k.trim().is_empty() => "configured",
        _ => "from secret store",
    }
}
