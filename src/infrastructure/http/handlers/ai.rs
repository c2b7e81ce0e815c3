//! AI Endpoint Handlers
//!
//! 生成编排器通过 HTTP 调用的两个端点，请求与响应均为 camelCase

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    GenerateOutline, GenerateSection, OutlineRequest, OutlineResponse, SectionRequest,
    SectionResponse,
};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 生成大纲
pub async fn generate_outline(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OutlineRequest>,
) -> Result<Json<ApiResponse<OutlineResponse>>, ApiError> {
    let outline = state
        .generate_outline_handler
        .handle(GenerateOutline {
            ebook_id: req.ebook_id,
            description: req.description,
        })
        .await?;

    Ok(Json(ApiResponse::success(OutlineResponse { outline })))
}

/// 生成一个章节并保存为页面
pub async fn generate_section(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SectionRequest>,
) -> Result<Json<ApiResponse<SectionResponse>>, ApiError> {
    let page = state
        .generate_section_handler
        .handle(GenerateSection {
            ebook_id: req.ebook_id,
            section_title: req.section_title,
            section_index: req.section_index,
            total_sections: req.total_sections,
            description: req.description,
        })
        .await?;

    Ok(Json(ApiResponse::success(SectionResponse { page })))
}
