//! Generation Context - AI 生成限界上下文
//!
//! 职责:
//! - 生成阶段状态机与进度计算
//! - LLM 回复的大纲解析与 HTML 清洗

mod errors;
mod outline;
mod progress;

pub use errors::GenerationStateError;
pub use outline::{clean_html_fragment, parse_outline};
pub use progress::{
    section_label, section_percent, GenerationProgress, GenerationSession, GenerationStage,
    COMPLETE_PERCENT, EXPANDING_PERCENT, LABEL_CANCELLED, LABEL_COMPLETE, LABEL_ERROR,
    LABEL_OUTLINE, OUTLINE_PERCENT,
};
