//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod completion;
mod generation_endpoints;
mod repositories;
mod run_registry;

pub use completion::{CompletionError, CompletionPort, CompletionRequest};
pub use generation_endpoints::{
    EndpointError, GeneratedPage, GenerationEndpointsPort, OutlineRequest, OutlineResponse,
    SectionRequest, SectionResponse,
};
pub use repositories::{
    EbookRecord, EbookRepositoryPort, PageRecord, PageRepositoryPort, RepositoryError,
};
pub use run_registry::{GenerationRun, RunError, RunOutcome, RunRegistryPort};
