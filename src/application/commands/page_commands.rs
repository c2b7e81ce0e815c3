//! Page Commands

use uuid::Uuid;

/// 创建页面命令
#[derive(Debug, Clone)]
pub struct CreatePage {
    pub ebook_id: Uuid,
    pub title: String,
    pub content: String,
    pub template: Option<String>,
    /// 未指定时追加到末尾
    pub order: Option<usize>,
}

/// 更新页面命令（None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdatePage {
    pub page_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub template: Option<String>,
}

/// 删除页面命令
#[derive(Debug, Clone)]
pub struct DeletePage {
    pub page_id: Uuid,
}
