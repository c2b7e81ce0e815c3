//! Generation Adapter - 编排器调用大纲/章节端点的 HTTP 客户端

mod http_generation_client;

pub use http_generation_client::*;
