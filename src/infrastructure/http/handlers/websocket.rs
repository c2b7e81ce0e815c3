//! WebSocket Handlers

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::infrastructure::events::WsEvent;
use crate::infrastructure::http::state::AppState;

/// 单本电子书的 WebSocket（生成进度、页面创建、完成/取消/失败）
pub async fn ebook_websocket_handler(
    ws: WebSocketUpgrade,
    Path(ebook_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ebook_socket(socket, ebook_id, state))
}

/// 全局 WebSocket（所有电子书的事件）
pub async fn global_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_global_socket(socket, state))
}

async fn handle_ebook_socket(socket: WebSocket, ebook_id: Uuid, state: Arc<AppState>) {
    let event_rx = state.event_publisher.subscribe_ebook(ebook_id);

    tracing::info!(ebook_id = %ebook_id, "Ebook WebSocket connected");

    pump(socket, event_rx).await;

    state.event_publisher.release_ebook(ebook_id);
    tracing::info!(ebook_id = %ebook_id, "Ebook WebSocket disconnected");
}

async fn handle_global_socket(socket: WebSocket, state: Arc<AppState>) {
    let event_rx = state.event_publisher.subscribe_global();

    tracing::info!("Global WebSocket connected");

    pump(socket, event_rx).await;

    tracing::info!("Global WebSocket disconnected");
}

/// 转发事件到客户端，同时读取客户端消息直到连接关闭
async fn pump(socket: WebSocket, mut event_rx: broadcast::Receiver<WsEvent>) {
    let (mut sender, mut receiver) = socket.split();

    // 事件转发任务
    let forward_task = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    if !send_event(&mut sender, &event).await {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "WebSocket subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // 接收客户端消息（心跳）
    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!("WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "WebSocket error");
                    break;
                }
                // Ping 由 axum 自动回复 Pong
                _ => {}
            }
        }
    });

    // 等待任一任务完成
    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }
}

async fn send_event(sender: &mut SplitSink<WebSocket, Message>, event: &WsEvent) -> bool {
    let msg = match serde_json::to_string(event) {
        Ok(json) => Message::Text(json),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize event");
            return true;
        }
    };

    if let Err(e) = sender.send(msg).await {
        tracing::debug!(error = %e, "Failed to send WebSocket message");
        return false;
    }
    true
}
