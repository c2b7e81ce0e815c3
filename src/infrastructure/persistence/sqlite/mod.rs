//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod ebook_repo;
mod page_repo;

pub use database::*;
pub use ebook_repo::*;
pub use page_repo::*;
