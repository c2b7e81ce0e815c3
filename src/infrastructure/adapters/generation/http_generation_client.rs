//! HTTP Generation Client - 调用大纲与章节端点
//!
//! 实现 GenerationEndpointsPort trait
//!
//! POST {base_url}/api/ai/outline
//! POST {base_url}/api/ai/section
//! Response: {"errno": 0, "error": "", "data": {...}}
//!
//! 请求不设超时；取消令牌触发时立即放弃进行中的请求。

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    EndpointError, GeneratedPage, GenerationEndpointsPort, OutlineRequest, OutlineResponse,
    SectionRequest, SectionResponse,
};

const OUTLINE_PATH: &str = "/api/ai/outline";
const SECTION_PATH: &str = "/api/ai/section";

/// 统一响应信封
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    errno: i32,
    #[serde(default)]
    error: String,
    data: Option<T>,
}

/// HTTP 生成端点客户端
pub struct HttpGenerationClient {
    client: Client,
    base_url: String,
}

impl HttpGenerationClient {
    /// 创建客户端
    pub fn new(base_url: impl Into<String>) -> Result<Self, EndpointError> {
        let client = Client::builder()
            .build()
            .map_err(|e| EndpointError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
        cancel: &CancellationToken,
    ) -> Result<Resp, EndpointError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        if cancel.is_cancelled() {
            return Err(EndpointError::Cancelled);
        }

        let url = self.url(path);
        let call = async {
            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| EndpointError::Transport(e.to_string()))?;

            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| EndpointError::Transport(e.to_string()))?;

            if !status.is_success() {
                return Err(EndpointError::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }

            let envelope: Envelope<Resp> = serde_json::from_slice(&bytes)
                .map_err(|e| EndpointError::Malformed(e.to_string()))?;

            if envelope.errno != 0 {
                return Err(EndpointError::Rejected {
                    errno: envelope.errno,
                    message: envelope.error,
                });
            }

            envelope
                .data
                .ok_or_else(|| EndpointError::Malformed("response carries no data".to_string()))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(url = %url, "Generation request aborted");
                Err(EndpointError::Cancelled)
            }
            result = call => result,
        }
    }
}

#[async_trait]
impl GenerationEndpointsPort for HttpGenerationClient {
    async fn generate_outline(
        &self,
        request: &OutlineRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, EndpointError> {
        let response: OutlineResponse = self.post(OUTLINE_PATH, request, cancel).await?;
        Ok(response.outline)
    }

    async fn generate_section(
        &self,
        request: &SectionRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedPage, EndpointError> {
        let response: SectionResponse = self.post(SECTION_PATH, request, cancel).await?;
        Ok(response.page)
    }
}
