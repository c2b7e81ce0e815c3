//! Template HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ListTemplates, TemplatesResponse};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

/// 列出页面模板与封面模板
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<TemplatesResponse>> {
    Json(ApiResponse::success(
        state.list_templates_handler.handle(ListTemplates),
    ))
}
