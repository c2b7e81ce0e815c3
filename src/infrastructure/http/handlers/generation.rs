//! Generation HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CancelGeneration, GenerationStatusResponse, GetGenerationStatus, StartGeneration,
};
use crate::infrastructure::http::dto::{
    ApiResponse, CancelGenerationData, RunIdRequest, StartGenerationData, StartGenerationRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 启动生成运行（立即返回 run_id，进度通过 WS 推送）
pub async fn start_generation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartGenerationRequest>,
) -> Result<Json<ApiResponse<StartGenerationData>>, ApiError> {
    let response = state
        .start_generation_handler
        .handle(StartGeneration {
            ebook_id: req.ebook_id,
            description: req.description,
        })
        .await?;

    Ok(Json(ApiResponse::success(response.into())))
}

/// 查询生成运行状态
pub async fn generation_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunIdRequest>,
) -> Result<Json<ApiResponse<GenerationStatusResponse>>, ApiError> {
    let status = state
        .get_generation_status_handler
        .handle(GetGenerationStatus { run_id: req.run_id })
        .await?;

    Ok(Json(ApiResponse::success(status)))
}

/// 取消生成运行
pub async fn cancel_generation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunIdRequest>,
) -> Result<Json<ApiResponse<CancelGenerationData>>, ApiError> {
    let response = state
        .cancel_generation_handler
        .handle(CancelGeneration { run_id: req.run_id })
        .await?;

    Ok(Json(ApiResponse::success(response.into())))
}
