//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                 GET   健康检查
//! - /api/ai/outline           POST  生成大纲（camelCase）
//! - /api/ai/section           POST  生成一个章节并保存为页面（camelCase）
//! - /api/generation/start     POST  启动后台生成运行
//! - /api/generation/status    POST  查询运行状态
//! - /api/generation/cancel    POST  取消运行
//! - /api/ebook/create         POST  创建电子书
//! - /api/ebook/get            POST  获取电子书详情
//! - /api/ebook/update         POST  更新标题/描述/封面
//! - /api/ebook/theme          POST  更新主题
//! - /api/ebook/delete         POST  删除电子书
//! - /api/ebook/list           GET   列出所有电子书
//! - /api/page/create|get|update|delete|list  POST  页面管理
//! - /api/template/list        GET   列出页面与封面模板
//! - /ws/ebook/{id}            WS    单本电子书的生成事件
//! - /ws/events                WS    全局事件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/ebook/:ebook_id", get(handlers::ebook_websocket_handler))
        .route("/ws/events", get(handlers::global_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/ai", ai_routes())
        .nest("/generation", generation_routes())
        .nest("/ebook", ebook_routes())
        .nest("/page", page_routes())
        .route("/template/list", get(handlers::list_templates))
}

/// AI 端点路由
fn ai_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/outline", post(handlers::generate_outline))
        .route("/section", post(handlers::generate_section))
}

/// Generation 路由
fn generation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start", post(handlers::start_generation))
        .route("/status", post(handlers::generation_status))
        .route("/cancel", post(handlers::cancel_generation))
}

/// Ebook 路由
fn ebook_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_ebook))
        .route("/get", post(handlers::get_ebook))
        .route("/update", post(handlers::update_ebook))
        .route("/theme", post(handlers::update_theme))
        .route("/delete", post(handlers::delete_ebook))
        .route("/list", get(handlers::list_ebooks))
}

/// Page 路由
fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_page))
        .route("/get", post(handlers::get_page))
        .route("/update", post(handlers::update_page))
        .route("/delete", post(handlers::delete_page))
        .route("/list", post(handlers::list_pages))
}
