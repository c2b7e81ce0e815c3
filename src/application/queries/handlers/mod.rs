//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod ebook_handlers;
mod generation_handlers;
mod page_handlers;

pub use ebook_handlers::*;
pub use generation_handlers::*;
pub use page_handlers::*;
