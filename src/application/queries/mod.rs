//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod ebook_queries;
mod generation_queries;
mod page_queries;

pub mod handlers;

pub use ebook_queries::*;
pub use generation_queries::*;
pub use page_queries::*;
