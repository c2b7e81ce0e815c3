//! Generation Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{GenerationRun, RunOutcome, RunRegistryPort};
use crate::application::queries::GetGenerationStatus;
use crate::domain::generation::GenerationStage;

/// 生成运行状态快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatusResponse {
    pub run_id: Uuid,
    pub ebook_id: Uuid,
    pub stage: GenerationStage,
    pub percent: u8,
    pub label: String,
    pub outline: Vec<String>,
    pub pages_created: usize,
    pub outcome: Option<RunOutcome>,
    pub started_at: String,
    pub finished_at: Option<String>,
}

impl From<GenerationRun> for GenerationStatusResponse {
    fn from(run: GenerationRun) -> Self {
        Self {
            run_id: run.run_id,
            ebook_id: run.ebook_id,
            stage: run.progress.stage,
            percent: run.progress.percent,
            label: run.progress.current_step_label,
            outline: run.outline,
            pages_created: run.pages_created,
            outcome: run.outcome,
            started_at: run.started_at.to_rfc3339(),
            finished_at: run.finished_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// GetGenerationStatus Handler
pub struct GetGenerationStatusHandler {
    run_registry: Arc<dyn RunRegistryPort>,
}

impl GetGenerationStatusHandler {
    pub fn new(run_registry: Arc<dyn RunRegistryPort>) -> Self {
        Self { run_registry }
    }

    pub async fn handle(
        &self,
        query: GetGenerationStatus,
    ) -> Result<GenerationStatusResponse, ApplicationError> {
        let run = self
            .run_registry
            .get(query.run_id)
            .ok_or_else(|| ApplicationError::not_found("Generation run", query.run_id))?;

        Ok(GenerationStatusResponse::from(run))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::{GenerationProgress, LABEL_OUTLINE, OUTLINE_PERCENT};

    #[test]
    fn test_snapshot_uses_camel_case() {
        let mut run = GenerationRun::new(Uuid::new_v4(), "Bread".to_string());
        run.progress = GenerationProgress {
            stage: GenerationStage::Outline,
            percent: OUTLINE_PERCENT,
            current_step_label: LABEL_OUTLINE.to_string(),
        };

        let json = serde_json::to_value(GenerationStatusResponse::from(run)).unwrap();

        assert_eq!(json["stage"], "outline");
        assert_eq!(json["percent"], 10);
        assert_eq!(json["label"], "Generating outline...");
        assert_eq!(json["pagesCreated"], 0);
        assert!(json["finishedAt"].is_null());
    }
}
