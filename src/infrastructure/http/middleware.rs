//! HTTP Middleware
//!
//! 记录非 2xx/3xx 的 HTTP 响应；业务错误以 HTTP 200 + errno 返回，
//! 由 `ApiError::into_response()` 记录

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use http::StatusCode;

/// 响应的日志分类
#[derive(Debug, PartialEq, Eq)]
enum Failure {
    /// 请求体超过 `server.max_body_bytes`
    BodyTooLarge,
    Client,
    Server,
}

fn classify(status: StatusCode) -> Option<Failure> {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Some(Failure::BodyTooLarge)
    } else if status.is_client_error() {
        Some(Failure::Client)
    } else if status.is_server_error() {
        Some(Failure::Server)
    } else {
        None
    }
}

/// 只记录路径，查询串可能带有页面内容
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match classify(response.status()) {
        Some(Failure::BodyTooLarge) => {
            tracing::warn!(%method, %path, status, elapsed_ms, "Request body exceeds limit")
        }
        Some(Failure::Client) => {
            tracing::warn!(%method, %path, status, elapsed_ms, "Request rejected")
        }
        Some(Failure::Server) => {
            tracing::error!(%method, %path, status, elapsed_ms, "Request failed")
        }
        None => {}
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::DefaultBodyLimit,
        http::Request as HttpRequest,
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    async fn accept_body(body: String) -> String {
        body
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/api/ping", get(|| async { "ok" }))
            .route("/api/page/update", post(accept_body))
            .route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(DefaultBodyLimit::max(16))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(request: HttpRequest<Body>) -> StatusCode {
        create_test_router().oneshot(request).await.unwrap().status()
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify(StatusCode::OK), None);
        assert_eq!(classify(StatusCode::SWITCHING_PROTOCOLS), None);
        assert_eq!(
            classify(StatusCode::PAYLOAD_TOO_LARGE),
            Some(Failure::BodyTooLarge)
        );
        assert_eq!(
            classify(StatusCode::UNPROCESSABLE_ENTITY),
            Some(Failure::Client)
        );
        assert_eq!(classify(StatusCode::BAD_GATEWAY), Some(Failure::Server));
    }

    #[tokio::test]
    async fn test_passes_successful_responses_through() {
        let request = HttpRequest::builder()
            .uri("/api/ping")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_oversized_body_is_client_error() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/page/update")
            .body(Body::from("x".repeat(64)))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_server_error_preserved() {
        let request = HttpRequest::builder()
            .uri("/boom")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
