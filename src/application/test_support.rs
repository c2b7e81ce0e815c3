//! 应用层测试替身

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::ports::{
    CompletionError, CompletionPort, CompletionRequest, EbookRecord, EbookRepositoryPort,
    GenerationRun, PageRecord, PageRepositoryPort, RepositoryError, RunError, RunOutcome,
    RunRegistryPort,
};
use crate::domain::ebook::{CoverTemplate, Theme, Title};
use crate::domain::generation::GenerationProgress;

#[derive(Default)]
pub struct InMemoryEbookRepo {
    ebooks: DashMap<Uuid, EbookRecord>,
}

#[async_trait]
impl EbookRepositoryPort for InMemoryEbookRepo {
    async fn save(&self, ebook: &EbookRecord) -> Result<(), RepositoryError> {
        self.ebooks.insert(ebook.id, ebook.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EbookRecord>, RepositoryError> {
        Ok(self.ebooks.get(&id).map(|e| e.clone()))
    }

    async fn find_all(&self) -> Result<Vec<EbookRecord>, RepositoryError> {
        let mut all: Vec<_> = self.ebooks.iter().map(|e| e.clone()).collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn update_theme(&self, id: Uuid, theme: &Theme) -> Result<(), RepositoryError> {
        let mut ebook = self
            .ebooks
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        ebook.theme = theme.clone();
        ebook.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.ebooks.remove(&id);
        Ok(())
    }
}

/// 写入一本默认电子书，返回其 ID
pub async fn seeded_ebook(repo: &InMemoryEbookRepo) -> Uuid {
    let now = Utc::now();
    let ebook = EbookRecord {
        id: Uuid::new_v4(),
        title: Title::new("Seeded").unwrap().into_inner(),
        description: None,
        cover_template: CoverTemplate::default(),
        theme: Theme::default(),
        created_at: now,
        updated_at: now,
    };
    repo.save(&ebook).await.unwrap();
    ebook.id
}

#[derive(Default)]
pub struct InMemoryPageRepo {
    pages: DashMap<Uuid, PageRecord>,
}

#[async_trait]
impl PageRepositoryPort for InMemoryPageRepo {
    async fn save(&self, page: &PageRecord) -> Result<(), RepositoryError> {
        self.pages.insert(page.id, page.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PageRecord>, RepositoryError> {
        Ok(self.pages.get(&id).map(|p| p.clone()))
    }

    async fn find_by_ebook(&self, ebook_id: Uuid) -> Result<Vec<PageRecord>, RepositoryError> {
        let mut pages: Vec<_> = self
            .pages
            .iter()
            .filter(|p| p.ebook_id == ebook_id)
            .map(|p| p.clone())
            .collect();
        pages.sort_by_key(|p| p.order);
        Ok(pages)
    }

    async fn next_order(&self, ebook_id: Uuid) -> Result<usize, RepositoryError> {
        Ok(self
            .pages
            .iter()
            .filter(|p| p.ebook_id == ebook_id)
            .map(|p| p.order + 1)
            .max()
            .unwrap_or(0))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.pages.remove(&id);
        Ok(())
    }
}

/// 只回答 `active_for_ebook` 的运行表
pub struct StaticRunRegistry {
    active: Option<Uuid>,
}

impl StaticRunRegistry {
    pub fn active() -> Self {
        Self {
            active: Some(Uuid::new_v4()),
        }
    }

    pub fn idle() -> Self {
        Self { active: None }
    }
}

impl RunRegistryPort for StaticRunRegistry {
    fn register(&self, run: GenerationRun) -> Result<Uuid, RunError> {
        match self.active {
            Some(run_id) => Err(RunError::AlreadyRunning {
                ebook_id: run.ebook_id,
                run_id,
            }),
            None => Ok(run.run_id),
        }
    }

    fn get(&self, _run_id: Uuid) -> Option<GenerationRun> {
        None
    }

    fn active_for_ebook(&self, _ebook_id: Uuid) -> Option<Uuid> {
        self.active
    }

    fn cancellation_token(&self, _run_id: Uuid) -> Option<CancellationToken> {
        None
    }

    fn update_progress(&self, _run_id: Uuid, _progress: &GenerationProgress) {}

    fn set_outline(&self, _run_id: Uuid, _outline: Vec<String>) {}

    fn record_page(&self, _run_id: Uuid) {}

    fn finish(&self, _run_id: Uuid, _outcome: RunOutcome) {}

    fn cancel(&self, run_id: Uuid) -> Result<bool, RunError> {
        Err(RunError::NotFound(run_id))
    }

    fn evict_finished(&self, _retention: Duration) -> usize {
        0
    }
}

/// 按顺序返回预设回复的补全服务，并记录收到的请求
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<Vec<Result<String, CompletionError>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn replying(replies: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        let mut replies = replies;
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.requests.lock().unwrap().last().map(|r| r.prompt.clone())
    }
}

#[async_trait]
impl CompletionPort for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(CompletionError::ServiceError("no scripted reply".into())))
    }
}
