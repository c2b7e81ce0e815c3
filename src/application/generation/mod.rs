//! 应用层 - AI 生成编排

mod orchestrator;

pub use orchestrator::{
    GenerationError, GenerationOrchestrator, GenerationRequest, GenerationSummary, NoopReporter,
    ProgressReporter,
};
