//! Completion Port - LLM 文本补全抽象
//!
//! 大纲与章节内容都由外部 LLM 服务生成，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 补全错误
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// 系统提示词
    pub system: String,
    /// 用户提示词
    pub prompt: String,
    /// 最大生成 token 数
    pub max_tokens: Option<u32>,
}

/// Completion Port
#[async_trait]
pub trait CompletionPort: Send + Sync {
    /// 执行一次补全，返回助手回复的文本
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;

    /// 检查 LLM 服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
