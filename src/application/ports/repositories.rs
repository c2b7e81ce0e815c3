//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::ebook::{CoverTemplate, PageTemplate, Theme};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Ebook Repository
// ============================================================================

/// 电子书实体（用于持久化）
#[derive(Debug, Clone)]
pub struct EbookRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub cover_template: CoverTemplate,
    pub theme: Theme,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ebook Repository Port
#[async_trait]
pub trait EbookRepositoryPort: Send + Sync {
    /// 保存电子书（不存在则插入，存在则更新）
    async fn save(&self, ebook: &EbookRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找电子书
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EbookRecord>, RepositoryError>;

    /// 获取所有电子书（按更新时间倒序）
    async fn find_all(&self) -> Result<Vec<EbookRecord>, RepositoryError>;

    /// 更新主题
    async fn update_theme(&self, id: Uuid, theme: &Theme) -> Result<(), RepositoryError>;

    /// 删除电子书及其所有页面
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// Page Repository
// ============================================================================

/// 页面实体（用于持久化）
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: Uuid,
    pub ebook_id: Uuid,
    pub title: String,
    /// HTML 内容
    pub content: String,
    pub template: PageTemplate,
    pub order: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Page Repository Port
#[async_trait]
pub trait PageRepositoryPort: Send + Sync {
    /// 保存页面（不存在则插入，存在则更新）
    async fn save(&self, page: &PageRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找页面
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PageRecord>, RepositoryError>;

    /// 获取电子书的所有页面（按 order 升序）
    async fn find_by_ebook(&self, ebook_id: Uuid) -> Result<Vec<PageRecord>, RepositoryError>;

    /// 下一个可用的 order（当前最大值 + 1，无页面时为 0）
    async fn next_order(&self, ebook_id: Uuid) -> Result<usize, RepositoryError>;

    /// 删除页面
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
