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
/// 1. 环境变量（前缀 `BOOKLOOM_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `BOOKLOOM_SERVER__PORT=8080`
/// - `BOOKLOOM_LLM__URL=http://llm:8000`
/// - `BOOKLOOM_LLM__API_KEY=sk-...`
/// - `BOOKLOOM_GENERATION__MAX_SECTIONS=6`
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
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("server.max_body_bytes", 4 * 1024 * 1024)?
        .set_default("llm.url", "http://localhost:11434")?
        .set_default("llm.model", "llama3.1")?
        .set_default("llm.timeout_secs", 120)?
        .set_default("llm.temperature", 0.7)?
        .set_default("database.path", "data/bookloom.db")?
        .set_default("database.max_connections", 5)?
        .set_default("generation.max_sections", 8)?
        .set_default("generation.reload_delay_ms", 2000)?
        .set_default("generation.run_retention_secs", 600)?
        .set_default("generation.max_concurrent_runs", 4)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），例如 BOOKLOOM_LLM__MODEL=gpt-4o-mini
    builder = builder.add_source(
        Environment::with_prefix("BOOKLOOM")
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
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.llm.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM URL cannot be empty".to_string(),
        ));
    }

    if config.llm.model.is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM model cannot be empty".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(ConfigError::ValidationError(
            "LLM temperature must be within 0.0..=2.0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.generation.max_sections == 0 {
        return Err(ConfigError::ValidationError(
            "generation.max_sections must be at least 1".to_string(),
        ));
    }

    if config.generation.max_concurrent_runs == 0 {
        return Err(ConfigError::ValidationError(
            "generation.max_concurrent_runs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("LLM URL: {}", config.llm.url);
    tracing::info!("LLM Model: {}", config.llm.model);
    tracing::info!("LLM Timeout: {}s", config.llm.timeout_secs);
    tracing::info!("LLM API Key: {}", if config.llm.api_key.is_some() { "set" } else { "unset" });
    tracing::info!("Database: {}", config.database.path);
    tracing::info!(
        "Generation Endpoints: {}",
        config.generation.endpoint_base_url(&config.server)
    );
    tracing::info!("Max Sections: {}", config.generation.max_sections);
    tracing::info!("Run Retention: {}s", config.generation.run_retention_secs);
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
    fn test_validation_error_for_empty_llm_url() {
        let mut config = AppConfig::default();
        config.llm.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_sections() {
        let mut config = AppConfig::default();
        config.generation.max_sections = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookloom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[llm]
model = "gpt-4o-mini"
api_key = "secret"

[generation]
max_sections = 5
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key.as_deref(), Some("secret"));
        assert_eq!(config.generation.max_sections, 5);
        assert_eq!(config.generation.reload_delay_ms, 2000);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookloom.toml");
        std::fs::write(&path, "[llm]\ntemperature = 3.5\n").unwrap();

        assert!(matches!(
            load_config_from_path(Some(&path)),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
