//! Page Queries

use uuid::Uuid;

/// 获取页面详情查询
#[derive(Debug, Clone)]
pub struct GetPage {
    pub page_id: Uuid,
}

/// 列出电子书的所有页面（按 order 升序）
#[derive(Debug, Clone)]
pub struct ListPages {
    pub ebook_id: Uuid,
}
