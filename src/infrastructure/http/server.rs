//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::path::PathBuf;
use std::sync::Arc;

use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 挂载在 /static 的目录
    pub static_dir: PathBuf,
    /// GET / 返回的首页文件
    pub index_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            static_dir: PathBuf::from("static"),
            index_file: PathBuf::from("templates/index.html"),
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_static_files(
        mut self,
        static_dir: impl Into<PathBuf>,
        index_file: impl Into<PathBuf>,
    ) -> Self {
        self.static_dir = static_dir.into();
        self.index_file = index_file.into();
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    fn build_router(&self) -> Router {
        create_routes(&self.config.static_dir, &self.config.index_file)
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FileAudioStorage;

    #[test]
    fn test_server_config() {
        let config = ServerConfig::new("0.0.0.0", 9000).with_static_files("public", "public/index.html");
        assert_eq!(config.addr(), "0.0.0.0:9000");
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.index_file, PathBuf::from("public/index.html"));
    }

    #[tokio::test]
    async fn test_server_stops_on_shutdown_signal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileAudioStorage::new(temp_dir.path().join("generated"), "/static/generated")
            .await
            .unwrap();
        let state = AppState::new(None, Arc::new(storage));
        let config = ServerConfig::new("127.0.0.1", 0)
            .with_static_files(temp_dir.path(), temp_dir.path().join("index.html"));

        HttpServer::new(config, state)
            .run_with_shutdown(async {})
            .await
            .unwrap();
    }
}
