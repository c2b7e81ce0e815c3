//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod generation;
pub mod llm;

pub use generation::*;
pub use llm::*;
