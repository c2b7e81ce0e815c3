//! Generation Commands - 生成运行的启动与取消

use uuid::Uuid;

/// 启动生成运行命令
#[derive(Debug, Clone)]
pub struct StartGeneration {
    pub ebook_id: Uuid,
    pub description: String,
}

/// 启动生成运行响应
#[derive(Debug, Clone)]
pub struct StartGenerationResponse {
    pub run_id: Uuid,
    pub ebook_id: Uuid,
}

/// 取消生成运行命令
#[derive(Debug, Clone)]
pub struct CancelGeneration {
    pub run_id: Uuid,
}

/// 取消生成运行响应
#[derive(Debug, Clone)]
pub struct CancelGenerationResponse {
    pub run_id: Uuid,
    /// 运行已结束时为 false
    pub cancelled: bool,
}
