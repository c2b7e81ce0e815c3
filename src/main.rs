//! Bookloom - AI 电子书生成服务
//!
//! 启动顺序：配置 → 日志 → 数据库 → 适配器 → 生成 Worker → HTTP 服务器

use std::sync::Arc;
use std::time::Duration;

use bookloom::application::GenerationOrchestrator;
use bookloom::config::{load_config, print_config, AppConfig};
use bookloom::infrastructure::adapters::{
    HttpCompletionClient, HttpCompletionClientConfig, HttpGenerationClient,
};
use bookloom::infrastructure::events::EventPublisher;
use bookloom::infrastructure::http::{AppState, HttpServer, ServerConfig};
use bookloom::infrastructure::memory::InMemoryRunRegistry;
use bookloom::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteEbookRepository, SqlitePageRepository,
};
use bookloom::infrastructure::worker::{GenerationWorker, GenerationWorkerConfig};
use tokio::sync::mpsc;

/// 生成运行队列容量
const RUN_QUEUE_CAPACITY: usize = 256;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},bookloom={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Bookloom - AI ebook generation service");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let ebook_repo = Arc::new(SqliteEbookRepository::new(pool.clone()));
    let page_repo = Arc::new(SqlitePageRepository::new(pool));

    // 创建 LLM 客户端
    let llm_config = HttpCompletionClientConfig::new(&config.llm.url, &config.llm.model)
        .with_api_key(config.llm.api_key.clone())
        .with_timeout(config.llm.timeout_secs)
        .with_temperature(config.llm.temperature);
    let completion = Arc::new(HttpCompletionClient::new(llm_config)?);

    // 编排器通过本服务自己的 /api/ai/* 端点生成
    let endpoint_base_url = config.generation.endpoint_base_url(&config.server);
    let endpoints = Arc::new(HttpGenerationClient::new(endpoint_base_url.clone())?);
    let orchestrator = Arc::new(GenerationOrchestrator::new(endpoints));
    tracing::info!(endpoint_base_url = %endpoint_base_url, "Generation endpoints configured");

    // 创建事件发布器
    let event_publisher = EventPublisher::new().arc();

    // 创建运行队列与运行表
    let (run_tx, run_rx) = mpsc::channel(RUN_QUEUE_CAPACITY);
    let run_registry = InMemoryRunRegistry::new(run_tx).arc();

    // 创建并启动 GenerationWorker
    let worker_config = GenerationWorkerConfig {
        max_concurrent: config.generation.max_concurrent_runs,
        reload_delay_ms: config.generation.reload_delay_ms,
        run_retention: Duration::from_secs(config.generation.run_retention_secs),
        ..GenerationWorkerConfig::default()
    };
    let worker = GenerationWorker::new(
        worker_config,
        run_rx,
        run_registry.clone(),
        orchestrator,
        event_publisher.clone(),
    );
    tokio::spawn(worker.run());

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.server.max_body_bytes);
    let state = AppState::new(
        ebook_repo,
        page_repo,
        completion,
        run_registry,
        event_publisher,
        config.generation.max_sections,
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
