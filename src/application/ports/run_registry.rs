//! Run Registry Port - 生成运行管理
//!
//! 记录每次生成运行的进度与取消令牌，所有状态存储在内存中。
//! 同一本电子书同一时间只允许一个活跃运行。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::generation::GenerationProgress;

/// Run Registry 错误
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Generation run not found: {0}")]
    NotFound(Uuid),

    #[error("Ebook {ebook_id} already has an active generation run {run_id}")]
    AlreadyRunning { ebook_id: Uuid, run_id: Uuid },

    #[error("Failed to enqueue generation run: {0}")]
    QueueFull(String),
}

/// 运行结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Cancelled,
    Failed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Cancelled => "cancelled",
            RunOutcome::Failed => "failed",
        }
    }
}

/// 一次生成运行
#[derive(Debug, Clone)]
pub struct GenerationRun {
    pub run_id: Uuid,
    pub ebook_id: Uuid,
    pub description: String,
    pub progress: GenerationProgress,
    pub outline: Vec<String>,
    pub pages_created: usize,
    pub outcome: Option<RunOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl GenerationRun {
    pub fn new(ebook_id: Uuid, description: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            ebook_id,
            description,
            progress: GenerationProgress::default(),
            outline: Vec::new(),
            pages_created: 0,
            outcome: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.outcome.is_none()
    }
}

/// Run Registry Port
pub trait RunRegistryPort: Send + Sync {
    /// 登记新运行并放入执行队列
    fn register(&self, run: GenerationRun) -> Result<Uuid, RunError>;

    /// 获取运行快照
    fn get(&self, run_id: Uuid) -> Option<GenerationRun>;

    /// 获取电子书当前的活跃运行
    fn active_for_ebook(&self, ebook_id: Uuid) -> Option<Uuid>;

    /// 获取运行的取消令牌
    fn cancellation_token(&self, run_id: Uuid) -> Option<CancellationToken>;

    /// 更新进度
    fn update_progress(&self, run_id: Uuid, progress: &GenerationProgress);

    /// 记录大纲
    fn set_outline(&self, run_id: Uuid, outline: Vec<String>);

    /// 记录一个已创建的页面
    fn record_page(&self, run_id: Uuid);

    /// 标记运行结束
    fn finish(&self, run_id: Uuid, outcome: RunOutcome);

    /// 请求取消；运行已结束时返回 false
    fn cancel(&self, run_id: Uuid) -> Result<bool, RunError>;

    /// 清理结束时间早于 `retention` 的运行，返回清理数量
    fn evict_finished(&self, retention: Duration) -> usize;
}
