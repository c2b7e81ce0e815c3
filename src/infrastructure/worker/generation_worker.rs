//! Generation Worker - Background Ebook Generation Processor

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use uuid::Uuid;

use crate::application::ports::{GeneratedPage, RunOutcome, RunRegistryPort};
use crate::application::{
    GenerationError, GenerationOrchestrator, GenerationRequest, ProgressReporter,
};
use crate::domain::generation::{
    GenerationProgress, GenerationSession, LABEL_CANCELLED, LABEL_COMPLETE, LABEL_ERROR,
};
use crate::infrastructure::events::EventPublisher;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct GenerationWorkerConfig {
    /// 同时执行的运行数上限
    pub max_concurrent: usize,
    /// 成功后通知客户端重新加载的延迟（毫秒）
    pub reload_delay_ms: u64,
    /// 已结束运行的保留时间
    pub run_retention: Duration,
    /// 清理间隔
    pub eviction_interval: Duration,
}

impl Default for GenerationWorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            reload_delay_ms: 2000,
            run_retention: Duration::from_secs(600),
            eviction_interval: Duration::from_secs(60),
        }
    }
}

/// 生成 Worker
///
/// 从队列消费 run_id，每个运行在独立的 tokio 任务中执行编排器
pub struct GenerationWorker {
    config: GenerationWorkerConfig,
    queue_receiver: mpsc::Receiver<Uuid>,
    run_registry: Arc<dyn RunRegistryPort>,
    orchestrator: Arc<GenerationOrchestrator>,
    event_publisher: Arc<EventPublisher>,
}

impl GenerationWorker {
    pub fn new(
        config: GenerationWorkerConfig,
        queue_receiver: mpsc::Receiver<Uuid>,
        run_registry: Arc<dyn RunRegistryPort>,
        orchestrator: Arc<GenerationOrchestrator>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            config,
            queue_receiver,
            run_registry,
            orchestrator,
            event_publisher,
        }
    }

    /// 启动 Worker
    pub async fn run(mut self) {
        tracing::info!(
            max_concurrent = self.config.max_concurrent,
            "GenerationWorker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut eviction = tokio::time::interval(self.config.eviction_interval);

        loop {
            tokio::select! {
                received = self.queue_receiver.recv() => {
                    let Some(run_id) = received else { break };

                    let semaphore = semaphore.clone();
                    let run_registry = self.run_registry.clone();
                    let orchestrator = self.orchestrator.clone();
                    let event_publisher = self.event_publisher.clone();
                    let reload_delay_ms = self.config.reload_delay_ms;

                    // permit 在任务内获取，排队中的运行不阻塞接收与清理
                    tokio::spawn(async move {
                        Self::process_run(
                            run_id,
                            semaphore,
                            run_registry,
                            orchestrator,
                            event_publisher,
                            reload_delay_ms,
                        )
                        .await;
                    });
                }
                _ = eviction.tick() => {
                    self.run_registry.evict_finished(self.config.run_retention);
                }
            }
        }

        tracing::info!("GenerationWorker stopped");
    }

    /// 执行单个运行
    async fn process_run(
        run_id: Uuid,
        semaphore: Arc<Semaphore>,
        run_registry: Arc<dyn RunRegistryPort>,
        orchestrator: Arc<GenerationOrchestrator>,
        event_publisher: Arc<EventPublisher>,
        reload_delay_ms: u64,
    ) {
        let (run, cancel) = match (
            run_registry.get(run_id),
            run_registry.cancellation_token(run_id),
        ) {
            (Some(run), Some(cancel)) => (run, cancel),
            _ => {
                tracing::warn!(run_id = %run_id, "Generation run not found, skipping");
                return;
            }
        };
        let ebook_id = run.ebook_id;

        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = semaphore.acquire_owned() => match permit {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::error!(run_id = %run_id, "Failed to acquire semaphore permit");
                    return;
                }
            },
        };

        // 排队期间已取消：不发 started，也不上报进度
        if cancel.is_cancelled() {
            tracing::info!(run_id = %run_id, "Generation run cancelled while queued");
            let mut session = GenerationSession::new();
            session.cancel();
            run_registry.update_progress(run_id, session.progress());
            Self::finish_run(
                &run_registry,
                &event_publisher,
                run_id,
                ebook_id,
                RunOutcome::Cancelled,
                None,
            );
            return;
        }

        event_publisher.publish_generation_started(run_id, ebook_id);

        let reporter = RunReporter {
            run_id,
            ebook_id,
            run_registry: run_registry.clone(),
            event_publisher: event_publisher.clone(),
        };
        let request = GenerationRequest {
            ebook_id,
            description: run.description,
        };

        let (outcome, reload_after_ms) = match orchestrator.run(request, &cancel, &reporter).await {
            Ok(_) => (RunOutcome::Completed, Some(reload_delay_ms)),
            Err(GenerationError::Cancelled) => (RunOutcome::Cancelled, None),
            Err(e) => {
                // 上游细节只进日志，客户端只看到通用标签
                tracing::warn!(run_id = %run_id, error = %e, "Generation run failed");
                (RunOutcome::Failed, None)
            }
        };

        Self::finish_run(
            &run_registry,
            &event_publisher,
            run_id,
            ebook_id,
            outcome,
            reload_after_ms,
        );
    }

    fn finish_run(
        run_registry: &Arc<dyn RunRegistryPort>,
        event_publisher: &EventPublisher,
        run_id: Uuid,
        ebook_id: Uuid,
        outcome: RunOutcome,
        reload_after_ms: Option<u64>,
    ) {
        let label = match outcome {
            RunOutcome::Completed => LABEL_COMPLETE,
            RunOutcome::Cancelled => LABEL_CANCELLED,
            RunOutcome::Failed => LABEL_ERROR,
        };

        run_registry.finish(run_id, outcome);
        event_publisher.publish_generation_finished(run_id, ebook_id, outcome, label, reload_after_ms);

        tracing::info!(
            run_id = %run_id,
            ebook_id = %ebook_id,
            outcome = outcome.as_str(),
            "Generation run finished"
        );
    }
}

/// 把编排器回调写入运行表并推送到 WebSocket
struct RunReporter {
    run_id: Uuid,
    ebook_id: Uuid,
    run_registry: Arc<dyn RunRegistryPort>,
    event_publisher: Arc<EventPublisher>,
}

impl ProgressReporter for RunReporter {
    fn on_progress(&self, progress: &GenerationProgress) {
        self.run_registry.update_progress(self.run_id, progress);
        self.event_publisher
            .publish_progress(self.run_id, self.ebook_id, progress);
    }

    fn on_outline(&self, outline: &[String]) {
        self.run_registry.set_outline(self.run_id, outline.to_vec());
        self.event_publisher
            .publish_outline(self.run_id, self.ebook_id, outline);
    }

    fn on_page_created(&self, _section_index: usize, page: &GeneratedPage) {
        self.run_registry.record_page(self.run_id);
        self.event_publisher
            .publish_page_created(self.run_id, self.ebook_id, page);
    }
}
