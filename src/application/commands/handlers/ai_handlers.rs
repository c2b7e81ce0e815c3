//! AI Command Handlers
//!
//! 大纲端点与章节端点的服务端实现：组装提示词、调用 LLM、清洗回复

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{GenerateOutline, GenerateSection};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CompletionPort, CompletionRequest, EbookRecord, EbookRepositoryPort, GeneratedPage,
    PageRecord, PageRepositoryPort,
};
use crate::domain::ebook::{PageTemplate, Title};
use crate::domain::generation::{clean_html_fragment, parse_outline};

/// 大纲最少章节数（写入提示词）
const MIN_SECTIONS: usize = 3;

const OUTLINE_SYSTEM_PROMPT: &str = "You are an experienced non-fiction editor. \
You plan the structure of short ebooks. Reply with a JSON array of section titles \
and nothing else.";

const SECTION_SYSTEM_PROMPT: &str = "You are a skilled ebook writer. \
You write one section of an ebook as a clean HTML fragment using only <h2>, <h3>, <p>, \
<ul>, <ol>, <li>, <blockquote>, <strong> and <em>. Do not wrap the fragment in \
<html> or <body> and do not use Markdown.";

const OUTLINE_MAX_TOKENS: u32 = 512;
const SECTION_MAX_TOKENS: u32 = 2048;

fn required_description(description: &str) -> Result<&str, ApplicationError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ApplicationError::validation("Description cannot be empty"));
    }
    Ok(description)
}

async fn load_ebook(
    ebook_repo: &Arc<dyn EbookRepositoryPort>,
    ebook_id: Uuid,
) -> Result<EbookRecord, ApplicationError> {
    ebook_repo
        .find_by_id(ebook_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Ebook", ebook_id))
}

// ============================================================================
// GenerateOutline
// ============================================================================

/// GenerateOutline Handler
pub struct GenerateOutlineHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
    completion: Arc<dyn CompletionPort>,
    max_sections: usize,
}

impl GenerateOutlineHandler {
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        completion: Arc<dyn CompletionPort>,
        max_sections: usize,
    ) -> Self {
        Self {
            ebook_repo,
            completion,
            max_sections: max_sections.max(1),
        }
    }

    pub async fn handle(&self, command: GenerateOutline) -> Result<Vec<String>, ApplicationError> {
        let description = required_description(&command.description)?;
        let ebook = load_ebook(&self.ebook_repo, command.ebook_id).await?;

        let prompt = format!(
            "Ebook title: {}\n\
             Topic: {}\n\n\
             Propose between {} and {} sections for this ebook, in reading order. \
             Return a JSON array of strings, e.g. [\"Introduction\", \"...\"].",
            ebook.title,
            description,
            MIN_SECTIONS.min(self.max_sections),
            self.max_sections
        );

        let reply = self
            .completion
            .complete(CompletionRequest {
                system: OUTLINE_SYSTEM_PROMPT.to_string(),
                prompt,
                max_tokens: Some(OUTLINE_MAX_TOKENS),
            })
            .await?;

        let outline = parse_outline(&reply, self.max_sections)?;

        tracing::info!(
            ebook_id = %ebook.id,
            sections = outline.len(),
            "Outline generated"
        );

        Ok(outline)
    }
}

// ============================================================================
// GenerateSection
// ============================================================================

/// GenerateSection Handler
///
/// 生成一个章节的 HTML 并以 `order = section_index` 保存为页面
pub struct GenerateSectionHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
    page_repo: Arc<dyn PageRepositoryPort>,
    completion: Arc<dyn CompletionPort>,
}

impl GenerateSectionHandler {
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        page_repo: Arc<dyn PageRepositoryPort>,
        completion: Arc<dyn CompletionPort>,
    ) -> Self {
        Self {
            ebook_repo,
            page_repo,
            completion,
        }
    }

    pub async fn handle(&self, command: GenerateSection) -> Result<GeneratedPage, ApplicationError> {
        if command.section_index >= command.total_sections {
            return Err(ApplicationError::validation(format!(
                "Section index {} is out of range for {} sections",
                command.section_index, command.total_sections
            )));
        }
        let title = Title::new(command.section_title)?;
        let description = required_description(&command.description)?;
        let ebook = load_ebook(&self.ebook_repo, command.ebook_id).await?;

        let prompt = format!(
            "Ebook title: {}\n\
             Topic: {}\n\n\
             Write section {} of {}, titled \"{}\". \
             Start with an <h2> heading carrying the section title.",
            ebook.title,
            description,
            command.section_index + 1,
            command.total_sections,
            title.as_str()
        );

        let reply = self
            .completion
            .complete(CompletionRequest {
                system: SECTION_SYSTEM_PROMPT.to_string(),
                prompt,
                max_tokens: Some(SECTION_MAX_TOKENS),
            })
            .await?;

        let content = clean_html_fragment(&reply);
        if content.is_empty() {
            return Err(ApplicationError::ExternalServiceError(
                "LLM returned empty section content".to_string(),
            ));
        }

        let now = Utc::now();
        let page = PageRecord {
            id: Uuid::new_v4(),
            ebook_id: ebook.id,
            title: title.into_inner(),
            content,
            template: PageTemplate::for_generated_section(command.section_index),
            order: command.section_index,
            created_at: now,
            updated_at: now,
        };
        self.page_repo.save(&page).await?;

        tracing::info!(
            ebook_id = %ebook.id,
            page_id = %page.id,
            section_index = command.section_index,
            total_sections = command.total_sections,
            "Section page generated"
        );

        Ok(GeneratedPage {
            id: page.id,
            title: page.title,
            order: page.order,
        })
    }
}
