//! Generation Command Handlers

use std::sync::Arc;

use crate::application::commands::{
    CancelGeneration, CancelGenerationResponse, StartGeneration, StartGenerationResponse,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{EbookRepositoryPort, GenerationRun, RunRegistryPort};

// ============================================================================
// StartGeneration
// ============================================================================

/// StartGeneration Handler
///
/// 校验输入后登记运行；实际执行由后台 worker 完成
pub struct StartGenerationHandler {
    ebook_repo: Arc<dyn EbookRepositoryPort>,
    run_registry: Arc<dyn RunRegistryPort>,
}

impl StartGenerationHandler {
    pub fn new(
        ebook_repo: Arc<dyn EbookRepositoryPort>,
        run_registry: Arc<dyn RunRegistryPort>,
    ) -> Self {
        Self {
            ebook_repo,
            run_registry,
        }
    }

    pub async fn handle(
        &self,
        command: StartGeneration,
    ) -> Result<StartGenerationResponse, ApplicationError> {
        let description = command.description.trim();
        if description.is_empty() {
            return Err(ApplicationError::validation("Description cannot be empty"));
        }

        self.ebook_repo
            .find_by_id(command.ebook_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Ebook", command.ebook_id))?;

        let run = GenerationRun::new(command.ebook_id, description.to_string());
        let run_id = self.run_registry.register(run)?;

        tracing::info!(run_id = %run_id, ebook_id = %command.ebook_id, "Generation run queued");

        Ok(StartGenerationResponse {
            run_id,
            ebook_id: command.ebook_id,
        })
    }
}

// ============================================================================
// CancelGeneration
// ============================================================================

/// CancelGeneration Handler
pub struct CancelGenerationHandler {
    run_registry: Arc<dyn RunRegistryPort>,
}

impl CancelGenerationHandler {
    pub fn new(run_registry: Arc<dyn RunRegistryPort>) -> Self {
        Self { run_registry }
    }

    pub async fn handle(
        &self,
        command: CancelGeneration,
    ) -> Result<CancelGenerationResponse, ApplicationError> {
        let cancelled = self.run_registry.cancel(command.run_id)?;

        if cancelled {
            tracing::info!(run_id = %command.run_id, "Generation cancel requested");
        } else {
            tracing::debug!(run_id = %command.run_id, "Cancel ignored, run already finished");
        }

        Ok(CancelGenerationResponse {
            run_id: command.run_id,
            cancelled,
        })
    }
}
