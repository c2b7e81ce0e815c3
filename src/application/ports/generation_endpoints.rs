//! Generation Endpoints Port - 生成编排器调用的两个 HTTP 端点
//!
//! POST outline  {description, ebookId} → {outline: [..]}
//! POST section  {ebookId, sectionTitle, sectionIndex, totalSections, description} → {page}
//!
//! 每次调用都携带取消令牌；令牌触发后调用必须以 `EndpointError::Cancelled` 结束，
//! 而不是普通的传输错误。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// 端点调用错误
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("request cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("endpoint rejected request (errno {errno}): {message}")]
    Rejected { errno: i32, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl EndpointError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EndpointError::Cancelled)
    }
}

/// 大纲请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineRequest {
    pub description: String,
    pub ebook_id: Uuid,
}

/// 大纲响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineResponse {
    pub outline: Vec<String>,
}

/// 章节内容请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub ebook_id: Uuid,
    pub section_title: String,
    pub section_index: usize,
    pub total_sections: usize,
    pub description: String,
}

/// 端点创建的页面摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPage {
    pub id: Uuid,
    pub title: String,
    pub order: usize,
}

/// 章节内容响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResponse {
    pub page: GeneratedPage,
}

/// Generation Endpoints Port
#[async_trait]
pub trait GenerationEndpointsPort: Send + Sync {
    /// 生成大纲
    async fn generate_outline(
        &self,
        request: &OutlineRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, EndpointError>;

    /// 生成一个章节并持久化为页面
    async fn generate_section(
        &self,
        request: &SectionRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedPage, EndpointError>;
}
