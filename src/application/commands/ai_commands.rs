//! AI Commands - 大纲端点与章节端点的服务端命令

use uuid::Uuid;

/// 生成大纲命令
#[derive(Debug, Clone)]
pub struct GenerateOutline {
    pub ebook_id: Uuid,
    pub description: String,
}

/// 生成章节命令（生成并持久化一个页面）
#[derive(Debug, Clone)]
pub struct GenerateSection {
    pub ebook_id: Uuid,
    pub section_title: String,
    pub section_index: usize,
    pub total_sections: usize,
    pub description: String,
}
