//! Generation Context - Errors

use thiserror::Error;

use super::GenerationStage;

#[derive(Debug, Error)]
pub enum GenerationStateError {
    #[error("cannot {action} while in stage {}", .stage.as_str())]
    InvalidTransition {
        action: &'static str,
        stage: GenerationStage,
    },

    #[error("outline is empty")]
    EmptyOutline,

    #[error("malformed outline: {0}")]
    MalformedOutline(String),

    #[error("section {got} completed out of order, expected {expected}")]
    OutOfOrder { expected: usize, got: usize },

    #[error("{done} of {total} sections completed")]
    SectionsPending { done: usize, total: usize },
}
