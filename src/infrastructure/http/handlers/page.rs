//! Page HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    CreatePage, DeletePage, GetPage, ListPages, PageResponse, UpdatePage,
};
use crate::infrastructure::http::dto::{
    ApiResponse, CreatePageRequest, Empty, ListPagesRequest, PageIdRequest, UpdatePageRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn create_page(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePageRequest>,
) -> Result<Json<ApiResponse<PageResponse>>, ApiError> {
    let page = state
        .create_page_handler
        .handle(CreatePage {
            ebook_id: req.ebook_id,
            title: req.title,
            content: req.content,
            template: req.template,
            order: req.order,
        })
        .await?;

    Ok(Json(ApiResponse::success(page.into())))
}

pub async fn get_page(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PageIdRequest>,
) -> Result<Json<ApiResponse<PageResponse>>, ApiError> {
    let page = state
        .get_page_handler
        .handle(GetPage { page_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(page)))
}

pub async fn update_page(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdatePageRequest>,
) -> Result<Json<ApiResponse<PageResponse>>, ApiError> {
    let page = state
        .update_page_handler
        .handle(UpdatePage {
            page_id: req.id,
            title: req.title,
            content: req.content,
            template: req.template,
        })
        .await?;

    Ok(Json(ApiResponse::success(page.into())))
}

pub async fn delete_page(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PageIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_page_handler
        .handle(DeletePage { page_id: req.id })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 按顺序列出电子书的页面
pub async fn list_pages(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListPagesRequest>,
) -> Result<Json<ApiResponse<Vec<PageResponse>>>, ApiError> {
    let pages = state
        .list_pages_handler
        .handle(ListPages {
            ebook_id: req.ebook_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(pages)))
}
