//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CancelGenerationHandler, CreateEbookHandler, CreatePageHandler, DeleteEbookHandler,
    DeletePageHandler, GenerateOutlineHandler, GenerateSectionHandler, StartGenerationHandler,
    UpdateEbookHandler, UpdatePageHandler, UpdateThemeHandler,
    // Query handlers
    GetEbookHandler, GetGenerationStatusHandler, GetPageHandler, ListEbooksHandler,
    ListPagesHandler, ListTemplatesHandler,
    // Ports
    CompletionPort, EbookRepositoryPort, PageRepositoryPort, RunRegistryPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub run_registry: Arc<dyn RunRegistryPort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub create_ebook_handler: CreateEbookHandler,
    pub update_ebook_handler: UpdateEbookHandler,
    pub update_theme_handler: UpdateThemeHandler,
    pub delete_ebook_handler: DeleteEbookHandler,
    pub create_page_handler: CreatePageHandler,
    pub update_page_handler: UpdatePageHandler,
    pub delete_page_handler: DeletePageHandler,
    pub generate_outline_handler: GenerateOutlineHandler,
    pub generate_section_handler: GenerateSectionHandler,
    pub start_generation_handler: StartGenerationHandler,
    pub cancel_generation_handler: CancelGenerationHandler,

    // ========== Query Handlers ==========
    pub get_ebook_handler: GetEbookHandler,
    pub list_ebooks_handler: ListEbooksHandler,
    pub get_page_handler: GetPageHandler,
    pub list_pages_handler: ListPagesHandler,
    pub list_templates_handler: ListTemplatesHandler,
    pub get_generation_status_handler: GetGenerationStatusHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        page_repo: Arc<dyn PageRepositoryPort>,
        completion: Arc<dyn CompletionPort>,
        run_registry: Arc<dyn RunRegistryPort>,
        event_publisher: Arc<EventPublisher>,
        max_sections: usize,
    ) -> Self {
        Self {
            // Ports
            run_registry: run_registry.clone(),
            event_publisher,

            // Command handlers
            create_ebook_handler: CreateEbookHandler::new(ebook_repo.clone()),
            update_ebook_handler: UpdateEbookHandler::new(ebook_repo.clone()),
            update_theme_handler: UpdateThemeHandler::new(ebook_repo.clone()),
            delete_ebook_handler: DeleteEbookHandler::new(ebook_repo.clone(), run_registry.clone()),
            create_page_handler: CreatePageHandler::new(ebook_repo.clone(), page_repo.clone()),
            update_page_handler: UpdatePageHandler::new(page_repo.clone()),
            delete_page_handler: DeletePageHandler::new(page_repo.clone()),
            generate_outline_handler: GenerateOutlineHandler::new(
                ebook_repo.clone(),
                completion.clone(),
                max_sections,
            ),
            generate_section_handler: GenerateSectionHandler::new(
                ebook_repo.clone(),
                page_repo.clone(),
                completion,
            ),
            start_generation_handler: StartGenerationHandler::new(
                ebook_repo.clone(),
                run_registry.clone(),
            ),
            cancel_generation_handler: CancelGenerationHandler::new(run_registry.clone()),

            // Query handlers
            get_ebook_handler: GetEbookHandler::new(ebook_repo.clone(), page_repo.clone()),
            list_ebooks_handler: ListEbooksHandler::new(ebook_repo.clone(), page_repo.clone()),
            get_page_handler: GetPageHandler::new(page_repo.clone()),
            list_pages_handler: ListPagesHandler::new(ebook_repo, page_repo),
            list_templates_handler: ListTemplatesHandler,
            get_generation_status_handler: GetGenerationStatusHandler::new(run_registry),
        }
    }
}
