//! Ebook HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CreateEbook, DeleteEbook, EbookResponse, GetEbook, ListEbooks, UpdateEbook, UpdateTheme,
};
use crate::domain::ebook::Theme;
use crate::infrastructure::http::dto::{
    ApiResponse, CreateEbookRequest, EbookIdRequest, Empty, UpdateEbookRequest,
    UpdateThemeRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 创建电子书
pub async fn create_ebook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEbookRequest>,
) -> Result<Json<ApiResponse<EbookResponse>>, ApiError> {
    let ebook = state
        .create_ebook_handler
        .handle(CreateEbook {
            title: req.title,
            description: req.description,
            cover_template: req.cover_template,
            theme: req.theme,
        })
        .await?;

    Ok(Json(ApiResponse::success(EbookResponse::from_record(ebook, 0))))
}

/// 获取电子书详情
pub async fn get_ebook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EbookIdRequest>,
) -> Result<Json<ApiResponse<EbookResponse>>, ApiError> {
    let ebook = state
        .get_ebook_handler
        .handle(GetEbook { ebook_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(ebook)))
}

/// 更新电子书基本信息
pub async fn update_ebook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateEbookRequest>,
) -> Result<Json<ApiResponse<EbookResponse>>, ApiError> {
    state
        .update_ebook_handler
        .handle(UpdateEbook {
            ebook_id: req.id,
            title: req.title,
            description: req.description,
            cover_template: req.cover_template,
        })
        .await?;

    // 重新查询以带上页面数
    let ebook = state
        .get_ebook_handler
        .handle(GetEbook { ebook_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(ebook)))
}

/// 更新主题
pub async fn update_theme(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateThemeRequest>,
) -> Result<Json<ApiResponse<Theme>>, ApiError> {
    let theme = state
        .update_theme_handler
        .handle(UpdateTheme {
            ebook_id: req.id,
            theme: req.theme,
        })
        .await?;

    Ok(Json(ApiResponse::success(theme)))
}

/// 删除电子书（连同页面），并通知订阅者
pub async fn delete_ebook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EbookIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_ebook_handler
        .handle(DeleteEbook { ebook_id: req.id })
        .await?;

    state.event_publisher.publish_ebook_deleted(req.id);

    Ok(Json(ApiResponse::ok()))
}

/// 列出所有电子书
pub async fn list_ebooks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<EbookResponse>>>, ApiError> {
    let ebooks = state.list_ebooks_handler.handle(ListEbooks).await?;
    Ok(Json(ApiResponse::success(ebooks)))
}
