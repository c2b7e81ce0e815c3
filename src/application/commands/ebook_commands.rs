//! Ebook Commands

use uuid::Uuid;

use crate::domain::ebook::Theme;

/// 创建电子书命令
#[derive(Debug, Clone)]
pub struct CreateEbook {
    pub title: String,
    pub description: Option<String>,
    pub cover_template: Option<String>,
    pub theme: Option<Theme>,
}

/// 更新电子书基本信息命令（None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdateEbook {
    pub ebook_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_template: Option<String>,
}

/// 更新主题命令
#[derive(Debug, Clone)]
pub struct UpdateTheme {
    pub ebook_id: Uuid,
    pub theme: Theme,
}

/// 删除电子书命令
#[derive(Debug, Clone)]
pub struct DeleteEbook {
    pub ebook_id: Uuid,
}
