//! Ebook Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{EbookRecord, EbookRepositoryPort, PageRepositoryPort};
use crate::application::queries::{GetEbook, ListEbooks, ListTemplates};
use crate::domain::ebook::{CoverTemplate, PageTemplate, Theme};

// ============================================================================
// Response DTOs
// ============================================================================

/// 电子书详情响应
#[derive(Debug, Clone, Serialize)]
pub struct EbookResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub cover_template: CoverTemplate,
    pub theme: Theme,
    pub page_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl EbookResponse {
    pub fn from_record(record: EbookRecord, page_count: usize) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            cover_template: record.cover_template,
            theme: record.theme,
            page_count,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// 模板列表响应
#[derive(Debug, Clone, Serialize)]
pub struct TemplatesResponse {
    pub page_templates: Vec<PageTemplate>,
    pub cover_templates: Vec<CoverTemplate>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetEbook Handler
pub struct GetEbookHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
    page_repo: Arc<dyn PageRepositoryPort>,
}

impl GetEbookHandler {
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        page_repo: Arc<dyn PageRepositoryPort>,
    ) -> Self {
        Self {
            ebook_repo,
            page_repo,
        }
    }

    pub async fn handle(&self, query: GetEbook) -> Result<EbookResponse, ApplicationError> {
        let ebook = self
            .ebook_repo
            .find_by_id(query.ebook_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Ebook", query.ebook_id))?;
        let pages = self.page_repo.find_by_ebook(ebook.id).await?;

        Ok(EbookResponse::from_record(ebook, pages.len()))
    }
}

/// ListEbooks Handler
pub struct ListEbooksHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
    page_repo: Arc<dyn PageRepositoryPort>,
}

impl ListEbooksHandler {
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        page_repo: Arc<dyn PageRepositoryPort>,
    ) -> Self {
        Self {
            ebook_repo,
            page_repo,
        }
    }

    pub async fn handle(&self, _query: ListEbooks) -> Result<Vec<EbookResponse>, ApplicationError> {
        let ebooks = self.ebook_repo.find_all().await?;

        let mut responses = Vec::with_capacity(ebooks.len());
        for ebook in ebooks {
            let page_count = self.page_repo.find_by_ebook(ebook.id).await?.len();
            responses.push(EbookResponse::from_record(ebook, page_count));
        }
        Ok(responses)
    }
}

/// ListTemplates Handler
pub struct ListTemplatesHandler;

impl ListTemplatesHandler {
    pub fn handle(&self, _query: ListTemplates) -> TemplatesResponse {
        TemplatesResponse {
            page_templates: PageTemplate::ALL.to_vec(),
            cover_templates: CoverTemplate::ALL.to_vec(),
        }
    }
}
