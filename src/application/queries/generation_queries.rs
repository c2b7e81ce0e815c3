//! Generation Queries

use uuid::Uuid;

/// 查询生成运行状态
#[derive(Debug, Clone)]
pub struct GetGenerationStatus {
    pub run_id: Uuid,
}
