//! Generation Orchestrator - 两阶段生成编排
//!
//! 1. 调用大纲端点一次
//! 2. 按大纲顺序逐个调用章节端点（严格串行，第 i+1 个请求在第 i 个结束前不会发出）
//!
//! 取消是协作式的：每次循环开始前检查令牌，进行中的请求通过同一令牌中止。
//! 没有重试，也不回滚已创建的页面。

use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::ports::{
    EndpointError, GeneratedPage, GenerationEndpointsPort, OutlineRequest, SectionRequest,
};
use crate::domain::generation::{GenerationProgress, GenerationSession, GenerationStage};

/// 生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 输入无效，未发出任何请求
    #[error("Invalid input: {0}")]
    UserInput(String),

    /// 用户取消
    #[error("Generation cancelled")]
    Cancelled,

    /// 端点返回失败或响应无效
    #[error("Upstream failure during {} (section {section_index:?}): {message}", .stage.as_str())]
    Upstream {
        stage: GenerationStage,
        section_index: Option<usize>,
        message: String,
    },
}

impl GenerationError {
    fn from_endpoint(
        err: EndpointError,
        stage: GenerationStage,
        section_index: Option<usize>,
        cancel: &CancellationToken,
    ) -> Self {
        // 令牌已触发时，传输层的任何失败都视为取消
        if err.is_cancelled() || cancel.is_cancelled() {
            return GenerationError::Cancelled;
        }
        GenerationError::Upstream {
            stage,
            section_index,
            message: err.to_string(),
        }
    }
}

/// 生成请求
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub ebook_id: Uuid,
    pub description: String,
}

/// 成功运行的结果
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub outline: Vec<String>,
    pub pages: Vec<GeneratedPage>,
}

/// 进度观察者
///
/// 回调在编排任务内同步执行
pub trait ProgressReporter: Send + Sync {
    fn on_progress(&self, _progress: &GenerationProgress) {}

    fn on_outline(&self, _outline: &[String]) {}

    fn on_page_created(&self, _section_index: usize, _page: &GeneratedPage) {}
}

/// 不关心进度时使用
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {}

/// 生成编排器
pub struct GenerationOrchestrator {
    endpoints: Arc<dyn GenerationEndpointsPort>,
}

impl GenerationOrchestrator {
    pub fn new(endpoints: Arc<dyn GenerationEndpointsPort>) -> Self {
        Self { endpoints }
    }

    /// 执行一次完整的生成运行
    ///
    /// 每次调用都使用全新的会话状态（进度 0、空大纲）。
    pub async fn run(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
        reporter: &dyn ProgressReporter,
    ) -> Result<GenerationSummary, GenerationError> {
        let description = request.description.trim().to_string();
        if description.is_empty() {
            return Err(GenerationError::UserInput(
                "description must not be empty".to_string(),
            ));
        }

        let mut session = GenerationSession::new();
        let result = self
            .drive(&mut session, request.ebook_id, description, cancel, reporter)
            .await;

        match &result {
            Ok(summary) => {
                tracing::info!(
                    ebook_id = %request.ebook_id,
                    sections = summary.pages.len(),
                    "Ebook generation completed"
                );
            }
            Err(GenerationError::Cancelled) => {
                session.cancel();
                reporter.on_progress(session.progress());
                tracing::info!(
                    ebook_id = %request.ebook_id,
                    sections_done = session.sections_done(),
                    "Ebook generation cancelled"
                );
            }
            Err(e) => {
                session.fail();
                reporter.on_progress(session.progress());
                tracing::error!(
                    ebook_id = %request.ebook_id,
                    sections_done = session.sections_done(),
                    error = %e,
                    "Ebook generation failed"
                );
            }
        }

        result
    }

    async fn drive(
        &self,
        session: &mut GenerationSession,
        ebook_id: Uuid,
        description: String,
        cancel: &CancellationToken,
        reporter: &dyn ProgressReporter,
    ) -> Result<GenerationSummary, GenerationError> {
        session.begin().map_err(|e| upstream(GenerationStage::Outline, None, e))?;
        reporter.on_progress(session.progress());

        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let outline_request = OutlineRequest {
            description: description.clone(),
            ebook_id,
        };
        let outline = self
            .endpoints
            .generate_outline(&outline_request, cancel)
            .await
            .map_err(|e| GenerationError::from_endpoint(e, GenerationStage::Outline, None, cancel))?;

        session
            .outline_received(outline)
            .map_err(|e| upstream(GenerationStage::Outline, None, e))?;
        let outline = session.outline().to_vec();
        let total = outline.len();

        tracing::info!(ebook_id = %ebook_id, sections = total, "Outline generated");
        reporter.on_outline(&outline);
        reporter.on_progress(session.progress());

        let mut pages = Vec::with_capacity(total);
        for (index, title) in outline.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }

            session
                .section_started(index)
                .map_err(|e| upstream(GenerationStage::Expanding, Some(index), e))?;
            reporter.on_progress(session.progress());

            let section_request = SectionRequest {
                ebook_id,
                section_title: title.clone(),
                section_index: index,
                total_sections: total,
                description: description.clone(),
            };
            let page = self
                .endpoints
                .generate_section(&section_request, cancel)
                .await
                .map_err(|e| {
                    GenerationError::from_endpoint(e, GenerationStage::Expanding, Some(index), cancel)
                })?;

            session
                .section_completed(index)
                .map_err(|e| upstream(GenerationStage::Expanding, Some(index), e))?;

            tracing::debug!(
                ebook_id = %ebook_id,
                section_index = index,
                page_id = %page.id,
                "Section generated"
            );
            reporter.on_page_created(index, &page);
            reporter.on_progress(session.progress());
            pages.push(page);
        }

        session
            .complete()
            .map_err(|e| upstream(GenerationStage::Expanding, None, e))?;
        reporter.on_progress(session.progress());

        Ok(GenerationSummary { outline, pages })
    }
}

fn upstream(
    stage: GenerationStage,
    section_index: Option<usize>,
    err: impl std::fmt::Display,
) -> GenerationError {
    GenerationError::Upstream {
        stage,
        section_index,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::{LABEL_CANCELLED, LABEL_ERROR};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 可编程的端点替身，记录所有章节请求
    #[derive(Default)]
    struct ScriptedEndpoints {
        outline: Vec<String>,
        outline_fails: bool,
        fail_section_at: Option<usize>,
        /// 该索引的请求会一直挂起，直到令牌被触发
        hang_section_at: Option<usize>,
        outline_calls: Mutex<usize>,
        section_calls: Mutex<Vec<SectionRequest>>,
    }

    impl ScriptedEndpoints {
        fn with_outline(titles: &[&str]) -> Self {
            Self {
                outline: titles.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            }
        }

        fn section_calls(&self) -> Vec<SectionRequest> {
            self.section_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationEndpointsPort for ScriptedEndpoints {
        async fn generate_outline(
            &self,
            _request: &OutlineRequest,
            _cancel: &CancellationToken,
        ) -> Result<Vec<String>, EndpointError> {
            *self.outline_calls.lock().unwrap() += 1;
            if self.outline_fails {
                return Err(EndpointError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(self.outline.clone())
        }

        async fn generate_section(
            &self,
            request: &SectionRequest,
            cancel: &CancellationToken,
        ) -> Result<GeneratedPage, EndpointError> {
            self.section_calls.lock().unwrap().push(request.clone());
            if self.hang_section_at == Some(request.section_index) {
                cancel.cancelled().await;
                return Err(EndpointError::Cancelled);
            }
            if self.fail_section_at == Some(request.section_index) {
                return Err(EndpointError::Rejected {
                    errno: 500,
                    message: "llm exploded".to_string(),
                });
            }
            Ok(GeneratedPage {
                id: Uuid::new_v4(),
                title: request.section_title.clone(),
                order: request.section_index,
            })
        }
    }

    /// 记录进度序列；可在第 k 个页面创建后触发取消
    #[derive(Default)]
    struct RecordingReporter {
        progress: Mutex<Vec<GenerationProgress>>,
        pages: Mutex<Vec<usize>>,
        cancel_after_pages: Option<(usize, CancellationToken)>,
    }

    impl RecordingReporter {
        fn percents(&self) -> Vec<u8> {
            let mut out: Vec<u8> = self.progress.lock().unwrap().iter().map(|p| p.percent).collect();
            out.dedup();
            out
        }

        fn last(&self) -> GenerationProgress {
            self.progress.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl ProgressReporter for RecordingReporter {
        fn on_progress(&self, progress: &GenerationProgress) {
            self.progress.lock().unwrap().push(progress.clone());
        }

        fn on_page_created(&self, section_index: usize, _page: &GeneratedPage) {
            let mut pages = self.pages.lock().unwrap();
            pages.push(section_index);
            if let Some((k, token)) = &self.cancel_after_pages {
                if pages.len() == *k {
                    token.cancel();
                }
            }
        }
    }

    fn request(description: &str) -> GenerationRequest {
        GenerationRequest {
            ebook_id: Uuid::new_v4(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_run_issues_one_call_per_section() {
        let endpoints = Arc::new(ScriptedEndpoints::with_outline(&[
            "Why sourdough", "Starter", "Flour", "Shaping", "Baking",
        ]));
        let orchestrator = GenerationOrchestrator::new(endpoints.clone());
        let reporter = RecordingReporter::default();

        let summary = orchestrator
            .run(request("A guide to sourdough baking"), &CancellationToken::new(), &reporter)
            .await
            .unwrap();

        assert_eq!(summary.pages.len(), 5);
        let calls = endpoints.section_calls();
        assert_eq!(calls.len(), 5);
        for (i, call) in calls.iter().enumerate() {
            assert_eq!(call.section_index, i);
            assert_eq!(call.total_sections, 5);
            assert_eq!(call.section_title, summary.outline[i]);
            assert_eq!(call.description, "A guide to sourdough baking");
        }

        assert_eq!(reporter.percents(), vec![10, 30, 43, 56, 69, 82, 95, 100]);
        let last = reporter.last();
        assert_eq!(last.stage, GenerationStage::Complete);
        assert_eq!(last.percent, 100);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_100_only_when_complete() {
        let endpoints = Arc::new(ScriptedEndpoints::with_outline(&["a", "b", "c", "d", "e", "f", "g"]));
        let orchestrator = GenerationOrchestrator::new(endpoints);
        let reporter = RecordingReporter::default();

        orchestrator
            .run(request("topic"), &CancellationToken::new(), &reporter)
            .await
            .unwrap();

        let progress = reporter.progress.lock().unwrap().clone();
        for pair in progress.windows(2) {
            assert!(pair[1].percent >= pair[0].percent);
        }
        for p in &progress {
            assert_eq!(p.percent == 100, p.stage == GenerationStage::Complete);
        }
    }

    #[tokio::test]
    async fn test_empty_description_issues_no_calls() {
        let endpoints = Arc::new(ScriptedEndpoints::with_outline(&["a"]));
        let orchestrator = GenerationOrchestrator::new(endpoints.clone());
        let reporter = RecordingReporter::default();

        let result = orchestrator
            .run(request("   \n\t"), &CancellationToken::new(), &reporter)
            .await;

        assert!(matches!(result, Err(GenerationError::UserInput(_))));
        assert_eq!(*endpoints.outline_calls.lock().unwrap(), 0);
        assert!(endpoints.section_calls().is_empty());
        assert!(reporter.progress.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_outline_failure_issues_no_section_calls() {
        let endpoints = Arc::new(ScriptedEndpoints {
            outline_fails: true,
            ..Default::default()
        });
        let orchestrator = GenerationOrchestrator::new(endpoints.clone());
        let reporter = RecordingReporter::default();

        let result = orchestrator
            .run(request("topic"), &CancellationToken::new(), &reporter)
            .await;

        assert!(matches!(
            result,
            Err(GenerationError::Upstream { stage: GenerationStage::Outline, .. })
        ));
        assert!(endpoints.section_calls().is_empty());
        let last = reporter.last();
        assert_eq!(last.stage, GenerationStage::Idle);
        assert_eq!(last.current_step_label, LABEL_ERROR);
    }

    #[tokio::test]
    async fn test_empty_outline_is_upstream_failure() {
        let endpoints = Arc::new(ScriptedEndpoints::with_outline(&[]));
        let orchestrator = GenerationOrchestrator::new(endpoints.clone());

        let result = orchestrator
            .run(request("topic"), &CancellationToken::new(), &NoopReporter)
            .await;

        assert!(matches!(result, Err(GenerationError::Upstream { .. })));
        assert!(endpoints.section_calls().is_empty());
    }

    #[tokio::test]
    async fn test_section_failure_stops_at_failing_index() {
        let endpoints = Arc::new(ScriptedEndpoints {
            fail_section_at: Some(2),
            ..ScriptedEndpoints::with_outline(&["a", "b", "c", "d", "e"])
        });
        let orchestrator = GenerationOrchestrator::new(endpoints.clone());
        let reporter = RecordingReporter::default();

        let result = orchestrator
            .run(request("topic"), &CancellationToken::new(), &reporter)
            .await;

        match result {
            Err(GenerationError::Upstream { stage, section_index, message }) => {
                assert_eq!(stage, GenerationStage::Expanding);
                assert_eq!(section_index, Some(2));
                assert!(message.contains("llm exploded"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let indices: Vec<usize> = endpoints.section_calls().iter().map(|c| c.section_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(*reporter.pages.lock().unwrap(), vec![0, 1]);
        // 错误详情不会出现在给用户的文案里
        assert_eq!(reporter.last().current_step_label, LABEL_ERROR);
    }

    #[tokio::test]
    async fn test_cancel_after_k_sections_issues_exactly_k_calls() {
        let endpoints = Arc::new(ScriptedEndpoints::with_outline(&["a", "b", "c", "d", "e"]));
        let orchestrator = GenerationOrchestrator::new(endpoints.clone());
        let token = CancellationToken::new();
        let reporter = RecordingReporter {
            cancel_after_pages: Some((2, token.clone())),
            ..Default::default()
        };

        let result = orchestrator.run(request("topic"), &token, &reporter).await;

        assert!(matches!(result, Err(GenerationError::Cancelled)));
        assert_eq!(endpoints.section_calls().len(), 2);
        let last = reporter.last();
        assert_eq!(last.stage, GenerationStage::Idle);
        assert_eq!(last.current_step_label, LABEL_CANCELLED);
    }

    #[tokio::test]
    async fn test_cancel_before_start_issues_no_calls() {
        let endpoints = Arc::new(ScriptedEndpoints::with_outline(&["a"]));
        let orchestrator = GenerationOrchestrator::new(endpoints.clone());
        let token = CancellationToken::new();
        token.cancel();

        let result = orchestrator.run(request("topic"), &token, &NoopReporter).await;

        assert!(matches!(result, Err(GenerationError::Cancelled)));
        assert_eq!(*endpoints.outline_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_in_flight_request_aborts_as_cancelled() {
        let endpoints = Arc::new(ScriptedEndpoints {
            hang_section_at: Some(1),
            ..ScriptedEndpoints::with_outline(&["a", "b", "c"])
        });
        let orchestrator = GenerationOrchestrator::new(endpoints.clone());
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = orchestrator.run(request("topic"), &token, &NoopReporter).await;

        assert!(matches!(result, Err(GenerationError::Cancelled)));
        // 第 1 节请求已发出但被中止，第 2 节从未发出
        let indices: Vec<usize> = endpoints.section_calls().iter().map(|c| c.section_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_rerun_starts_fresh() {
        let endpoints = Arc::new(ScriptedEndpoints::with_outline(&["a", "b"]));
        let orchestrator = GenerationOrchestrator::new(endpoints);

        let first = RecordingReporter::default();
        orchestrator
            .run(request("topic"), &CancellationToken::new(), &first)
            .await
            .unwrap();

        let second = RecordingReporter::default();
        orchestrator
            .run(request("topic"), &CancellationToken::new(), &second)
            .await
            .unwrap();

        let progress = second.progress.lock().unwrap().clone();
        assert_eq!(progress[0].percent, 10);
        assert_eq!(progress[0].stage, GenerationStage::Outline);
    }
}
