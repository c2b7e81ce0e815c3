//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、Completion、GenerationEndpoints、RunRegistry）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - generation: 两阶段生成编排器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod generation;
pub mod ports;
pub mod queries;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use commands::{
    // AI commands
    GenerateOutline,
    GenerateSection,
    // Ebook commands
    CreateEbook,
    DeleteEbook,
    UpdateEbook,
    UpdateTheme,
    // Generation commands
    CancelGeneration,
    CancelGenerationResponse,
    StartGeneration,
    StartGenerationResponse,
    // Page commands
    CreatePage,
    DeletePage,
    UpdatePage,
    // Handlers
    handlers::{
        CancelGenerationHandler, CreateEbookHandler, CreatePageHandler, DeleteEbookHandler,
        DeletePageHandler, GenerateOutlineHandler, GenerateSectionHandler,
        StartGenerationHandler, UpdateEbookHandler, UpdatePageHandler, UpdateThemeHandler,
    },
};

pub use error::ApplicationError;

pub use generation::{
    GenerationError, GenerationOrchestrator, GenerationRequest, GenerationSummary, NoopReporter,
    ProgressReporter,
};

pub use ports::{
    // Completion
    CompletionError,
    CompletionPort,
    CompletionRequest,
    // Generation endpoints
    EndpointError,
    GeneratedPage,
    GenerationEndpointsPort,
    OutlineRequest,
    OutlineResponse,
    SectionRequest,
    SectionResponse,
    // Repositories
    EbookRecord,
    EbookRepositoryPort,
    PageRecord,
    PageRepositoryPort,
    RepositoryError,
    // Run registry
    GenerationRun,
    RunError,
    RunOutcome,
    RunRegistryPort,
};

pub use queries::{
    // Ebook queries
    GetEbook,
    ListEbooks,
    ListTemplates,
    // Generation queries
    GetGenerationStatus,
    // Page queries
    GetPage,
    ListPages,
    // Handlers
    handlers::{
        EbookResponse, GenerationStatusResponse, GetEbookHandler, GetGenerationStatusHandler,
        GetPageHandler, ListEbooksHandler, ListPagesHandler, ListTemplatesHandler, PageResponse,
        TemplatesResponse,
    },
};
