//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{CompletionError, RepositoryError, RunError};
use crate::domain::ebook::EbookError;
use crate::domain::generation::GenerationStateError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 资源冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<EbookError> for ApplicationError {
    fn from(err: EbookError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<CompletionError> for ApplicationError {
    fn from(err: CompletionError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<GenerationStateError> for ApplicationError {
    fn from(err: GenerationStateError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<RunError> for ApplicationError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::NotFound(id) => Self::not_found("Generation run", id),
            RunError::AlreadyRunning { .. } => Self::Conflict(err.to_string()),
            RunError::QueueFull(_) => Self::InternalError(err.to_string()),
        }
    }
}
