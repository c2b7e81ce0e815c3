//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod ai_commands;
mod ebook_commands;
mod generation_commands;
mod page_commands;

pub mod handlers;

pub use ai_commands::*;
pub use ebook_commands::*;
pub use generation_commands::*;
pub use page_commands::*;
