//! Bookloom - AI 电子书生成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Ebook Context: 电子书、页面模板、主题
//! - Generation Context: 生成阶段、进度、大纲解析
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, Completion, GenerationEndpoints, RunRegistry）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//! - Generation: 大纲 → 逐章节的生成编排器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: RunRegistry 内存实现
//! - Worker: GenerationWorker 后台执行生成运行
//! - Persistence: SQLite 存储
//! - Adapters: LLM Client, Generation Endpoint Client
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
