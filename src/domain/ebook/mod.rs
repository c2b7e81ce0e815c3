//! Ebook Context - 电子书限界上下文
//!
//! 职责:
//! - 标题、页面模板、封面模板
//! - 视觉主题校验

mod errors;
mod value_objects;

pub use errors::EbookError;
pub use value_objects::{CoverTemplate, HeadingAccent, PageTemplate, Theme, Title};
