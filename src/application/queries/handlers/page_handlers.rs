//! Page Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{EbookRepositoryPort, PageRecord, PageRepositoryPort};
use crate::application::queries::{GetPage, ListPages};
use crate::domain::ebook::PageTemplate;

/// 页面响应
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub id: Uuid,
    pub ebook_id: Uuid,
    pub title: String,
    pub content: String,
    pub template: PageTemplate,
    pub order: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PageRecord> for PageResponse {
    fn from(record: PageRecord) -> Self {
        Self {
            id: record.id,
            ebook_id: record.ebook_id,
            title: record.title,
            content: record.content,
            template: record.template,
            order: record.order,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// GetPage Handler
pub struct GetPageHandler {
    page_repo: Arc<dyn PageRepositoryPort>,
}

impl GetPageHandler {
    pub fn new(page_repo: Arc<dyn PageRepositoryPort>) -> Self {
        Self { page_repo }
    }

    pub async fn handle(&self, query: GetPage) -> Result<PageResponse, ApplicationError> {
        let page = self
            .page_repo
            .find_by_id(query.page_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Page", query.page_id))?;

        Ok(PageResponse::from(page))
    }
}

/// ListPages Handler
pub struct ListPagesHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
    page_repo: Arc<dyn PageRepositoryPort>,
}

impl ListPagesHandler {
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        page_repo: Arc<dyn PageRepositoryPort>,
    ) -> Self {
        Self {
            ebook_repo,
            page_repo,
        }
    }

    pub async fn handle(&self, query: ListPages) -> Result<Vec<PageResponse>, ApplicationError> {
        // 验证电子书存在
        self.ebook_repo
            .find_by_id(query.ebook_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Ebook", query.ebook_id))?;

        let pages = self.page_repo.find_by_ebook(query.ebook_id).await?;
        Ok(pages.into_iter().map(PageResponse::from).collect())
    }
}
