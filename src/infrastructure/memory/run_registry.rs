//! In-Memory Run Registry Implementation

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::ports::{GenerationRun, RunError, RunOutcome, RunRegistryPort};
use crate::domain::generation::GenerationProgress;

struct RunEntry {
    run: GenerationRun,
    cancel: CancellationToken,
}

/// 内存运行表
pub struct InMemoryRunRegistry {
    /// run_id -> RunEntry
    runs: DashMap<Uuid, RunEntry>,
    /// ebook_id -> 活跃 run_id
    active_by_ebook: DashMap<Uuid, Uuid>,
    /// 运行队列发送端
    queue_sender: mpsc::Sender<Uuid>,
}

impl InMemoryRunRegistry {
    pub fn new(queue_sender: mpsc::Sender<Uuid>) -> Self {
        Self {
            runs: DashMap::new(),
            active_by_ebook: DashMap::new(),
            queue_sender,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl RunRegistryPort for InMemoryRunRegistry {
    fn register(&self, run: GenerationRun) -> Result<Uuid, RunError> {
        let run_id = run.run_id;
        let ebook_id = run.ebook_id;

        // 同一电子书只允许一个活跃运行
        match self.active_by_ebook.entry(ebook_id) {
            Entry::Occupied(existing) => {
                return Err(RunError::AlreadyRunning {
                    ebook_id,
                    run_id: *existing.get(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(run_id);
            }
        }

        self.runs.insert(
            run_id,
            RunEntry {
                run,
                cancel: CancellationToken::new(),
            },
        );

        if let Err(e) = self.queue_sender.try_send(run_id) {
            tracing::warn!(run_id = %run_id, error = %e, "Failed to enqueue generation run");
            self.runs.remove(&run_id);
            self.active_by_ebook.remove_if(&ebook_id, |_, active| *active == run_id);
            return Err(RunError::QueueFull(e.to_string()));
        }

        tracing::debug!(run_id = %run_id, ebook_id = %ebook_id, "Generation run registered");
        Ok(run_id)
    }

    fn get(&self, run_id: Uuid) -> Option<GenerationRun> {
        self.runs.get(&run_id).map(|entry| entry.run.clone())
    }

    fn active_for_ebook(&self, ebook_id: Uuid) -> Option<Uuid> {
        self.active_by_ebook.get(&ebook_id).map(|run_id| *run_id)
    }

    fn cancellation_token(&self, run_id: Uuid) -> Option<CancellationToken> {
        self.runs.get(&run_id).map(|entry| entry.cancel.clone())
    }

    fn update_progress(&self, run_id: Uuid, progress: &GenerationProgress) {
        if let Some(mut entry) = self.runs.get_mut(&run_id) {
            entry.run.progress = progress.clone();
        }
    }

    fn set_outline(&self, run_id: Uuid, outline: Vec<String>) {
        if let Some(mut entry) = self.runs.get_mut(&run_id) {
            entry.run.outline = outline;
        }
    }

    fn record_page(&self, run_id: Uuid) {
        if let Some(mut entry) = self.runs.get_mut(&run_id) {
            entry.run.pages_created += 1;
        }
    }

    fn finish(&self, run_id: Uuid, outcome: RunOutcome) {
        let ebook_id = match self.runs.get_mut(&run_id) {
            Some(mut entry) => {
                if entry.run.outcome.is_some() {
                    return;
                }
                entry.run.outcome = Some(outcome);
                entry.run.finished_at = Some(Utc::now());
                entry.run.ebook_id
            }
            None => return,
        };

        self.active_by_ebook
            .remove_if(&ebook_id, |_, active| *active == run_id);

        tracing::debug!(
            run_id = %run_id,
            outcome = outcome.as_str(),
            "Generation run finished"
        );
    }

    fn cancel(&self, run_id: Uuid) -> Result<bool, RunError> {
        let entry = self.runs.get(&run_id).ok_or(RunError::NotFound(run_id))?;

        if !entry.run.is_active() {
            return Ok(false);
        }

        entry.cancel.cancel();
        Ok(true)
    }

    fn evict_finished(&self, retention: Duration) -> usize {
        let now = Utc::now();
        let before = self.runs.len();

        self.runs.retain(|_, entry| match entry.run.finished_at {
            Some(finished_at) => (now - finished_at)
                .to_std()
                .map(|age| age < retention)
                .unwrap_or(true),
            None => true,
        });

        let evicted = before.saturating_sub(self.runs.len());
        if evicted > 0 {
            tracing::debug!(evicted = evicted, "Finished generation runs evicted");
        }
        evicted
    }
}
