//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM 服务配置
    #[serde(default)]
    pub llm: LlmConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 生成运行配置
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 请求体大小上限（字节）
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

fn default_max_body_bytes() -> usize {
    4 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// LLM 服务配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// 服务基础 URL，请求发往 `{url}/v1/chat/completions`
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// API Key，为空时不发送 Authorization 头
    #[serde(default)]
    pub api_key: Option<String>,

    /// 模型名称
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// 采样温度
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_llm_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "llama3.1".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            api_key: None,
            model: default_llm_model(),
            timeout_secs: default_llm_timeout(),
            temperature: default_temperature(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/bookloom.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 生成运行配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 编排器调用的大纲/章节端点所在服务；未设置时使用本服务的公开地址
    #[serde(default)]
    pub endpoint_base_url: Option<String>,

    /// 大纲最多章节数
    #[serde(default = "default_max_sections")]
    pub max_sections: usize,

    /// 生成成功后客户端重新加载前的等待时间（毫秒）
    #[serde(default = "default_reload_delay")]
    pub reload_delay_ms: u64,

    /// 已结束的运行保留时间（秒）
    #[serde(default = "default_run_retention")]
    pub run_retention_secs: u64,

    /// 同时执行的运行数上限
    #[serde(default = "default_max_concurrent_runs")]
    pub max_concurrent_runs: usize,
}

fn default_max_sections() -> usize {
    8
}

fn default_reload_delay() -> u64 {
    2000
}

fn default_run_retention() -> u64 {
    600
}

fn default_max_concurrent_runs() -> usize {
    4
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint_base_url: None,
            max_sections: default_max_sections(),
            reload_delay_ms: default_reload_delay(),
            run_retention_secs: default_run_retention(),
            max_concurrent_runs: default_max_concurrent_runs(),
        }
    }
}

impl GenerationConfig {
    /// 编排器实际调用的端点基础 URL
    pub fn endpoint_base_url(&self, server: &ServerConfig) -> String {
        self.endpoint_base_url
            .clone()
            .unwrap_or_else(|| server.public_base_url())
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
