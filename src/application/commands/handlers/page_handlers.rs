//! Page Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreatePage, DeletePage, UpdatePage};
use crate::application::error::ApplicationError;
use crate::application::ports::{EbookRepositoryPort, PageRecord, PageRepositoryPort};
use crate::domain::ebook::{EbookError, PageTemplate, Title};

/// 单页 HTML 内容上限（2 MB）
pub const MAX_PAGE_CONTENT_BYTES: usize = 2 * 1024 * 1024;

/// 页序号上限，存储列为 INTEGER
pub const MAX_PAGE_ORDER: usize = i64::MAX as usize;

fn parse_page_template(name: &str) -> Result<PageTemplate, ApplicationError> {
    PageTemplate::from_str(name).ok_or_else(|| EbookError::UnknownTemplate(name.to_string()).into())
}

fn check_content(content: &str) -> Result<(), ApplicationError> {
    if content.len() > MAX_PAGE_CONTENT_BYTES {
        return Err(ApplicationError::validation(format!(
            "Page content cannot exceed {} bytes",
            MAX_PAGE_CONTENT_BYTES
        )));
    }
    Ok(())
}

// ============================================================================
// CreatePage
// ============================================================================

/// CreatePage Handler
pub struct CreatePageHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
    page_repo: Arc<dyn PageRepositoryPort>,
}

impl CreatePageHandler {
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        page_repo: Arc<dyn PageRepositoryPort>,
    ) -> Self {
        Self {
            ebook_repo,
            page_repo,
        }
    }

    pub async fn handle(&self, command: CreatePage) -> Result<PageRecord, ApplicationError> {
        self.ebook_repo
            .find_by_id(command.ebook_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Ebook", command.ebook_id))?;

        let title = Title::new(command.title)?;
        check_content(&command.content)?;
        let template = match command.template.as_deref() {
            Some(name) => parse_page_template(name)?,
            None => PageTemplate::default(),
        };
        let order = match command.order {
            Some(order) if order > MAX_PAGE_ORDER => {
                return Err(ApplicationError::validation(format!(
                    "Page order cannot exceed {}",
                    MAX_PAGE_ORDER
                )));
            }
            Some(order) => order,
            None => self.page_repo.next_order(command.ebook_id).await?,
        };
        let now = Utc::now();

        let page = PageRecord {
            id: Uuid::new_v4(),
            ebook_id: command.ebook_id,
            title: title.into_inner(),
            content: command.content,
            template,
            order,
            created_at: now,
            updated_at: now,
        };

        self.page_repo.save(&page).await?;

        tracing::info!(
            page_id = %page.id,
            ebook_id = %page.ebook_id,
            order = page.order,
            "Page created"
        );

        Ok(page)
    }
}

// ============================================================================
// UpdatePage
// ============================================================================

/// UpdatePage Handler
pub struct UpdatePageHandler {
    page_repo: Arc<dyn PageRepositoryPort>,
}

impl UpdatePageHandler {
    pub fn new(page_repo: Arc<dyn PageRepositoryPort>) -> Self {
        Self { page_repo }
    }

    pub async fn handle(&self, command: UpdatePage) -> Result<PageRecord, ApplicationError> {
        let mut page = self
            .page_repo
            .find_by_id(command.page_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Page", command.page_id))?;

        if let Some(title) = command.title {
            page.title = Title::new(title)?.into_inner();
        }
        if let Some(content) = command.content {
            check_content(&content)?;
            page.content = content;
        }
        if let Some(name) = command.template.as_deref() {
            page.template = parse_page_template(name)?;
        }
        page.updated_at = Utc::now();

        self.page_repo.save(&page).await?;

        tracing::debug!(page_id = %page.id, "Page updated");

        Ok(page)
    }
}

// ============================================================================
// DeletePage
// ============================================================================

/// DeletePage Handler
pub struct DeletePageHandler {
    page_repo: Arc<dyn PageRepositoryPort>,
}

impl DeletePageHandler {
    pub fn new(page_repo: Arc<dyn PageRepositoryPort>) -> Self {
        Self { page_repo }
    }

    pub async fn handle(&self, command: DeletePage) -> Result<(), ApplicationError> {
        let page = self
            .page_repo
            .find_by_id(command.page_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Page", command.page_id))?;

        self.page_repo.delete(page.id).await?;

        tracing::info!(page_id = %page.id, ebook_id = %page.ebook_id, "Page deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{seeded_ebook, InMemoryEbookRepo, InMemoryPageRepo};

    fn create_command(ebook_id: Uuid, title: &str, order: Option<usize>) -> CreatePage {
        CreatePage {
            ebook_id,
            title: title.to_string(),
            content: "<p>Hello</p>".to_string(),
            template: None,
            order,
        }
    }

    #[tokio::test]
    async fn test_create_appends_at_end() {
        let ebooks = Arc::new(InMemoryEbookRepo::default());
        let pages = Arc::new(InMemoryPageRepo::default());
        let ebook_id = seeded_ebook(&ebooks).await;
        let handler = CreatePageHandler::new(ebooks, pages.clone());

        let first = handler.handle(create_command(ebook_id, "One", None)).await.unwrap();
        let second = handler.handle(create_command(ebook_id, "Two", None)).await.unwrap();

        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert_eq!(first.template, PageTemplate::Standard);
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_order() {
        let ebooks = Arc::new(InMemoryEbookRepo::default());
        let pages = Arc::new(InMemoryPageRepo::default());
        let ebook_id = seeded_ebook(&ebooks).await;
        let handler = CreatePageHandler::new(ebooks, pages.clone());

        let result = handler
            .handle(create_command(ebook_id, "Far", Some(usize::MAX)))
            .await;

        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
        assert_eq!(pages.find_by_ebook(ebook_id).await.unwrap().len(), 0);

        let last = handler
            .handle(create_command(ebook_id, "Last", Some(MAX_PAGE_ORDER)))
            .await
            .unwrap();
        assert_eq!(last.order, MAX_PAGE_ORDER);
    }

    #[tokio::test]
    async fn test_create_requires_existing_ebook() {
        let handler = CreatePageHandler::new(
            Arc::new(InMemoryEbookRepo::default()),
            Arc::new(InMemoryPageRepo::default()),
        );

        assert!(matches!(
            handler.handle(create_command(Uuid::new_v4(), "One", None)).await,
            Err(ApplicationError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_template_and_content() {
        let ebooks = Arc::new(InMemoryEbookRepo::default());
        let pages = Arc::new(InMemoryPageRepo::default());
        let ebook_id = seeded_ebook(&ebooks).await;
        let page = CreatePageHandler::new(ebooks, pages.clone())
            .handle(create_command(ebook_id, "One", Some(4)))
            .await
            .unwrap();

        let handler = UpdatePageHandler::new(pages.clone());
        let updated = handler
            .handle(UpdatePage {
                page_id: page.id,
                title: None,
                content: Some("<blockquote>Knead</blockquote>".to_string()),
                template: Some("quote".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.order, 4);
        assert_eq!(updated.template, PageTemplate::Quote);
        assert_eq!(updated.content, "<blockquote>Knead</blockquote>");

        assert!(handler
            .handle(UpdatePage {
                page_id: page.id,
                title: None,
                content: None,
                template: Some("poster".to_string()),
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_page_is_not_found() {
        let handler = DeletePageHandler::new(Arc::new(InMemoryPageRepo::default()));
        assert!(matches!(
            handler.handle(DeletePage { page_id: Uuid::new_v4() }).await,
            Err(ApplicationError::NotFound { .. })
        ));
    }
}
