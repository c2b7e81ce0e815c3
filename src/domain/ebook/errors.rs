//! Ebook Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EbookError {
    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的主题: {0}")]
    InvalidTheme(String),

    #[error("未知的模板: {0}")]
    UnknownTemplate(String),
}
