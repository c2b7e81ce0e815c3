//! LLM Adapter - OpenAI 兼容的补全客户端

mod http_completion_client;

pub use http_completion_client::*;
