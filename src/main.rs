//! musegen - 文本生成音乐服务
//!
//! 启动顺序: 配置 → 日志 → 模型网关 → HTTP 服务器

use std::sync::Arc;

use musegen::config::{load_config, print_config};
use musegen::infrastructure::adapters::{build_generator, FileAudioStorage};
use musegen::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},musegen={},tower_http=debug",
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

    tracing::info!("musegen - text-to-music generation service");
    print_config(&config);

    // 模型网关只初始化一次；失败时服务继续运行，/generate 直接返回错误
    let generator = match build_generator(&config.model).await {
        Ok(generator) => {
            tracing::info!(
                model = %generator.model_id(),
                device = %generator.device(),
                "Model gateway ready"
            );
            Some(generator)
        }
        Err(e) => {
            tracing::error!(error = %e, "Error loading model");
            None
        }
    };

    // 生成目录
    let storage = FileAudioStorage::new(
        config.storage.generated_dir(),
        config.storage.public_prefix(),
    )
    .await?;

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_static_files(&config.storage.static_dir, &config.storage.index_file);
    let state = AppState::new(generator, Arc::new(storage));

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
