//! Ebook Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateEbook, DeleteEbook, UpdateEbook, UpdateTheme};
use crate::application::error::ApplicationError;
use crate::application::ports::{EbookRecord, EbookRepositoryPort, RunRegistryPort};
use crate::domain::ebook::{CoverTemplate, EbookError, Theme, Title};

const MAX_DESCRIPTION_LEN: usize = 2000;

fn parse_cover_template(name: &str) -> Result<CoverTemplate, ApplicationError> {
    CoverTemplate::from_str(name)
        .ok_or_else(|| EbookError::UnknownTemplate(name.to_string()).into())
}

fn normalize_description(description: Option<String>) -> Result<Option<String>, ApplicationError> {
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if let Some(d) = &description {
        if d.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApplicationError::validation(format!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
    }
    Ok(description)
}

// ============================================================================
// CreateEbook
// ============================================================================

/// CreateEbook Handler
pub struct CreateEbookHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
}

impl CreateEbookHandler {
    pub fn new(ebook_repo: Arc<dyn EbookRepositoryPort>) -> Self {
        Self { ebook_repo }
    }

    pub async fn handle(&self, command: CreateEbook) -> Result<EbookRecord, ApplicationError> {
        let title = Title::new(command.title)?;
        let cover_template = match command.cover_template.as_deref() {
            Some(name) => parse_cover_template(name)?,
            None => CoverTemplate::default(),
        };
        let theme = command.theme.unwrap_or_default().validated()?;
        let now = Utc::now();

        let ebook = EbookRecord {
            id: Uuid::new_v4(),
            title: title.into_inner(),
            description: normalize_description(command.description)?,
            cover_template,
            theme,
            created_at: now,
            updated_at: now,
        };

        self.ebook_repo.save(&ebook).await?;

        tracing::info!(ebook_id = %ebook.id, title = %ebook.title, "Ebook created");

        Ok(ebook)
    }
}

// ============================================================================
// UpdateEbook
// ============================================================================

/// UpdateEbook Handler
pub struct UpdateEbookHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
}

impl UpdateEbookHandler {
    pub fn new(ebook_repo: Arc<dyn EbookRepositoryPort>) -> Self {
        Self { ebook_repo }
    }

    pub async fn handle(&self, command: UpdateEbook) -> Result<EbookRecord, ApplicationError> {
        let mut ebook = self
            .ebook_repo
            .find_by_id(command.ebook_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Ebook", command.ebook_id))?;

        if let Some(title) = command.title {
            ebook.title = Title::new(title)?.into_inner();
        }
        if command.description.is_some() {
            ebook.description = normalize_description(command.description)?;
        }
        if let Some(name) = command.cover_template.as_deref() {
            ebook.cover_template = parse_cover_template(name)?;
        }
        ebook.updated_at = Utc::now();

        self.ebook_repo.save(&ebook).await?;

        tracing::info!(ebook_id = %ebook.id, "Ebook updated");

        Ok(ebook)
    }
}

// ============================================================================
// UpdateTheme
// ============================================================================

/// UpdateTheme Handler
pub struct UpdateThemeHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
}

impl UpdateThemeHandler {
    pub fn new(ebook_repo: Arc<dyn EbookRepositoryPort>) -> Self {
        Self { ebook_repo }
    }

    pub async fn handle(&self, command: UpdateTheme) -> Result<Theme, ApplicationError> {
        self.ebook_repo
            .find_by_id(command.ebook_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Ebook", command.ebook_id))?;

        let theme = command.theme.validated()?;
        self.ebook_repo.update_theme(command.ebook_id, &theme).await?;

        tracing::info!(ebook_id = %command.ebook_id, "Ebook theme updated");

        Ok(theme)
    }
}

// ============================================================================
// DeleteEbook
// ============================================================================

/// DeleteEbook Handler
///
/// 电子书有活跃的生成运行时拒绝删除
pub struct DeleteEbookHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
    run_registry: Arc<dyn RunRegistryPort>,
}

impl DeleteEbookHandler {
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        run_registry: Arc<dyn RunRegistryPort>,
    ) -> Self {
        Self {
            ebook_repo,
            run_registry,
        }
    }

    pub async fn handle(&self, command: DeleteEbook) -> Result<(), ApplicationError> {
        let ebook_id = command.ebook_id;

        let ebook = self
            .ebook_repo
            .find_by_id(ebook_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Ebook", ebook_id))?;

        if let Some(run_id) = self.run_registry.active_for_ebook(ebook_id) {
            return Err(ApplicationError::Conflict(format!(
                "Ebook {} is being generated by run {}",
                ebook_id, run_id
            )));
        }

        self.ebook_repo.delete(ebook_id).await?;

        tracing::info!(ebook_id = %ebook_id, title = %ebook.title, "Ebook deleted");

        Ok(())
    }
}
