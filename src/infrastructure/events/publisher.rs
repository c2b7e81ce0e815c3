//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::application::ports::{GeneratedPage, RunOutcome};
use crate::domain::generation::{GenerationProgress, GenerationStage};

const CHANNEL_CAPACITY: usize = 100;

/// WebSocket 事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all_fields = "camelCase")]
pub enum WsEvent {
    /// 生成运行开始
    GenerationStarted { run_id: Uuid, ebook_id: Uuid },
    /// 进度变更
    GenerationProgress {
        run_id: Uuid,
        ebook_id: Uuid,
        stage: GenerationStage,
        percent: u8,
        label: String,
    },
    /// 大纲已生成
    GenerationOutline {
        run_id: Uuid,
        ebook_id: Uuid,
        outline: Vec<String>,
    },
    /// 章节页面已创建
    PageCreated {
        run_id: Uuid,
        ebook_id: Uuid,
        page_id: Uuid,
        title: String,
        order: usize,
    },
    /// 生成运行结束
    GenerationFinished {
        run_id: Uuid,
        ebook_id: Uuid,
        outcome: RunOutcome,
        label: String,
        /// 成功时客户端在该延迟后重新加载页面列表
        #[serde(skip_serializing_if = "Option::is_none")]
        reload_after_ms: Option<u64>,
    },
    /// 电子书已删除
    EbookDeleted { ebook_id: Uuid },
}

/// 事件发布器
pub struct EventPublisher {
    /// ebook_id -> broadcast sender（单本电子书的事件）
    ebook_channels: DashMap<Uuid, broadcast::Sender<WsEvent>>,
    /// 全局广播通道（所有事件）
    global_channel: broadcast::Sender<WsEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (global_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            ebook_channels: DashMap::new(),
            global_channel: global_tx,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全局事件
    pub fn subscribe_global(&self) -> broadcast::Receiver<WsEvent> {
        self.global_channel.subscribe()
    }

    /// 订阅单本电子书的事件，通道不存在时创建
    pub fn subscribe_ebook(&self, ebook_id: Uuid) -> broadcast::Receiver<WsEvent> {
        self.ebook_channels
            .entry(ebook_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// 没有订阅者时移除电子书通道
    pub fn release_ebook(&self, ebook_id: Uuid) {
        self.ebook_channels
            .remove_if(&ebook_id, |_, sender| sender.receiver_count() == 0);
    }

    pub fn publish_generation_started(&self, run_id: Uuid, ebook_id: Uuid) {
        self.publish(ebook_id, WsEvent::GenerationStarted { run_id, ebook_id });
    }

    pub fn publish_progress(&self, run_id: Uuid, ebook_id: Uuid, progress: &GenerationProgress) {
        self.publish(
            ebook_id,
            WsEvent::GenerationProgress {
                run_id,
                ebook_id,
                stage: progress.stage,
                percent: progress.percent,
                label: progress.current_step_label.clone(),
            },
        );
    }

    pub fn publish_outline(&self, run_id: Uuid, ebook_id: Uuid, outline: &[String]) {
        self.publish(
            ebook_id,
            WsEvent::GenerationOutline {
                run_id,
                ebook_id,
                outline: outline.to_vec(),
            },
        );
    }

    pub fn publish_page_created(&self, run_id: Uuid, ebook_id: Uuid, page: &GeneratedPage) {
        self.publish(
            ebook_id,
            WsEvent::PageCreated {
                run_id,
                ebook_id,
                page_id: page.id,
                title: page.title.clone(),
                order: page.order,
            },
        );
    }

    pub fn publish_generation_finished(
        &self,
        run_id: Uuid,
        ebook_id: Uuid,
        outcome: RunOutcome,
        label: &str,
        reload_after_ms: Option<u64>,
    ) {
        self.publish(
            ebook_id,
            WsEvent::GenerationFinished {
                run_id,
                ebook_id,
                outcome,
                label: label.to_string(),
                reload_after_ms,
            },
        );
    }

    pub fn publish_ebook_deleted(&self, ebook_id: Uuid) {
        self.publish(ebook_id, WsEvent::EbookDeleted { ebook_id });
    }

    /// 发布事件到电子书通道与全局通道
    fn publish(&self, ebook_id: Uuid, event: WsEvent) {
        if let Some(sender) = self.ebook_channels.get(&ebook_id) {
            if let Err(e) = sender.send(event.clone()) {
                tracing::debug!(
                    ebook_id = %ebook_id,
                    error = %e,
                    "Failed to publish event (no receivers)"
                );
            }
        }
        // 全局通道没有订阅者时 send 返回错误，忽略即可
        let _ = self.global_channel.send(event);
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
