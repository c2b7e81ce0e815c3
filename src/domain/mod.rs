//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Ebook Context: 电子书、页面模板与主题
//! - Generation Context: AI 生成的阶段与进度

pub mod ebook;
pub mod generation;
