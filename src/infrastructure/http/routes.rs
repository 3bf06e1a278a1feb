//! HTTP Routes
//!
//! Endpoints:
//! - /                GET   首页
//! - /generate        POST  生成音乐
//! - /api/ping        GET   健康检查
//! - /static/*        GET   静态文件（含生成的音频）

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(static_dir: &Path, index_file: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route_service("/", ServeFile::new(index_file))
        .route("/generate", post(handlers::generate_music))
        .route("/api/ping", get(handlers::ping))
        .nest_service("/static", ServeDir::new(static_dir))
}
