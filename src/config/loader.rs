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

use super::types::{AppConfig, ModelBackend};

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

/// 环境变量前缀
const ENV_PREFIX: &str = "MUSEGEN";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `MUSEGEN_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `MUSEGEN_SERVER__PORT=9000`
/// - `MUSEGEN_MODEL__URL=http://gpu-box:8000`
/// - `MUSEGEN_MODEL__DEVICE=cpu`
/// - `MUSEGEN_STORAGE__STATIC_DIR=/srv/musegen/static`
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
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8501)?
        .set_default("model.backend", "http")?
        .set_default("model.url", "http://localhost:8000")?
        .set_default("model.model_id", "facebook/musicgen-small")?
        .set_default("model.device", "auto")?
        .set_default("model.timeout_secs", 0)?
        .set_default("model.fake_sample_rate", 32000)?
        .set_default("model.fake_max_duration_secs", 3600)?
        .set_default("storage.static_dir", "static")?
        .set_default("storage.generated_subdir", "generated")?
        .set_default("storage.index_file", "templates/index.html")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: MUSEGEN_MODEL__URL=http://gpu-box:8000
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
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
///
/// 不对请求时长或并发数设上限
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.model.backend == ModelBackend::Http && config.model.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Model URL cannot be empty for the http backend".to_string(),
        ));
    }

    if config.model.fake_sample_rate == 0 {
        return Err(ConfigError::ValidationError(
            "Fake sample rate cannot be 0".to_string(),
        ));
    }

    if config.storage.static_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Static directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Model Backend: {}", config.model.backend);
    if config.model.backend == ModelBackend::Http {
        tracing::info!("Model URL: {}", config.model.url);
        tracing::info!("Model: {}", config.model.model_id);
        tracing::info!("Device Preference: {}", config.model.device);
        if config.model.timeout_secs > 0 {
            tracing::info!("Generation Timeout: {}s", config.model.timeout_secs);
        } else {
            tracing::info!("Generation Timeout: none");
        }
    }
    tracing::info!("Static Directory: {:?}", config.storage.static_dir);
    tracing::info!("Generated Directory: {:?}", config.storage.generated_dir());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_model_url() {
        let mut config = AppConfig::default();
        config.model.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_model_url_allowed_for_fake_backend() {
        let mut config = AppConfig::default();
        config.model.backend = ModelBackend::Fake;
        config.model.url = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_static_dir() {
        let mut config = AppConfig::default();
        config.storage.static_dir = Default::default();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[model]\nbackend = \"fake\"\ndevice = \"cpu\"\nfake_sample_rate = 16000"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.model.backend, ModelBackend::Fake);
        assert_eq!(config.model.device, crate::domain::DevicePreference::Cpu);
        assert_eq!(config.model.fake_sample_rate, 16000);
        assert_eq!(config.model.model_id, "facebook/musicgen-small");
    }
}
