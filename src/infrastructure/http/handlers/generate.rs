//! Generate Handler

use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{GenerateMusicRequest, GenerateMusicResponseDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// POST /generate
///
/// 模型不可用时在解析请求体之前就返回
pub async fn generate_music(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GenerateMusicResponseDto>, ApiError> {
    state.generate_music_handler.ensure_ready()?;

    let req = GenerateMusicRequest::from_json(&body)?;
    let result = state
        .generate_music_handler
        .handle(req.into_command())
        .await?;

    Ok(Json(GenerateMusicResponseDto::success(result.public_path)))
}
