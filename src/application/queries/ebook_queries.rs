//! Ebook Queries

use uuid::Uuid;

/// 获取电子书详情查询
#[derive(Debug, Clone)]
pub struct GetEbook {
    pub ebook_id: Uuid,
}

/// 列出所有电子书查询
#[derive(Debug, Clone)]
pub struct ListEbooks;

/// 列出可用的页面模板与封面模板
#[derive(Debug, Clone)]
pub struct ListTemplates;
