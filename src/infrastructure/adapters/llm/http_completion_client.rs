//! HTTP Completion Client - 调用 OpenAI 兼容的 LLM 服务
//!
//! 实现 CompletionPort trait
//!
//! 外部 LLM API:
//! POST {base_url}/v1/chat/completions
//! Request: {"model": "...", "messages": [...], "temperature": 0.7, "max_tokens": 512}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{CompletionError, CompletionPort, CompletionRequest};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// 聊天补全请求体
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP 补全客户端配置
#[derive(Debug, Clone)]
pub struct HttpCompletionClientConfig {
    /// LLM 服务基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 采样温度
    pub temperature: f32,
}

impl Default for HttpCompletionClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
            model: "llama3.1".to_string(),
            timeout_secs: 120,
            temperature: 0.7,
        }
    }
}

impl HttpCompletionClientConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// HTTP 补全客户端
pub struct HttpCompletionClient {
    client: Client,
    config: HttpCompletionClientConfig,
}

impl HttpCompletionClient {
    /// 创建新的补全客户端
    pub fn new(config: HttpCompletionClientConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn models_url(&self) -> String {
        format!("{}/v1/models", self.config.base_url.trim_end_matches('/'))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl CompletionPort for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            "Sending completion request"
        );

        let response = self
            .authorized(self.client.post(self.completions_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else if e.is_connect() {
                    CompletionError::NetworkError(format!("Cannot connect to LLM service: {}", e))
                } else {
                    CompletionError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CompletionError::InvalidResponse("Empty completion".to_string()))?;

        tracing::debug!(reply_len = content.len(), "Completion received");

        Ok(content)
    }

    async fn health_check(&self) -> bool {
        match self
            .authorized(self.client.get(self.models_url()))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn spawn_llm(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "be brief".to_string(),
            prompt: "outline please".to_string(),
            max_tokens: Some(64),
        }
    }

    #[test]
    fn test_config_builder() {
        let config = HttpCompletionClientConfig::new("http://llm:8000/", "gpt-4o-mini")
            .with_api_key(Some(String::new()))
            .with_timeout(30)
            .with_temperature(0.2);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout_secs, 30);

        let client = HttpCompletionClient::new(config).unwrap();
        assert_eq!(client.completions_url(), "http://llm:8000/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_complete_sends_chat_request() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer secret");
                assert_eq!(body["model"], "test-model");
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["content"], "outline please");
                assert_eq!(body["max_tokens"], 64);
                Json(json!({"choices": [{"message": {"role": "assistant", "content": "[\"A\"]"}}]}))
            }),
        );
        let base_url = spawn_llm(router).await;
        let client = HttpCompletionClient::new(
            HttpCompletionClientConfig::new(base_url, "test-model")
                .with_api_key(Some("secret".to_string())),
        )
        .unwrap();

        assert_eq!(client.complete(request()).await.unwrap(), "[\"A\"]");
    }

    #[tokio::test]
    async fn test_service_error_and_empty_choices() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                if body["max_tokens"] == 64 {
                    (axum::http::StatusCode::BAD_GATEWAY, Json(json!({"error": "down"})))
                } else {
                    (axum::http::StatusCode::OK, Json(json!({"choices": []})))
                }
            }),
        );
        let base_url = spawn_llm(router).await;
        let client =
            HttpCompletionClient::new(HttpCompletionClientConfig::new(base_url, "m")).unwrap();

        assert!(matches!(
            client.complete(request()).await,
            Err(CompletionError::ServiceError(_))
        ));

        let mut unbounded = request();
        unbounded.max_tokens = None;
        assert!(matches!(
            client.complete(unbounded).await,
            Err(CompletionError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let client = HttpCompletionClient::new(HttpCompletionClientConfig::new(
            "http://127.0.0.1:9",
            "m",
        ))
        .unwrap();
        let result = client.complete(request()).await;
        assert!(matches!(
            result,
            Err(CompletionError::NetworkError(_)) | Err(CompletionError::Timeout)
        ));
    }
}
