//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{GenerationError, MODEL_NOT_INITIALIZED};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// API 错误
///
/// 所有变体都返回 HTTP 500，message 为原始错误文本
#[derive(Debug)]
pub enum ApiError {
    ModelUnavailable,
    BadRequest(String),
    GenerationFailed(String),
    StorageFailed(String),
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::ModelUnavailable => MODEL_NOT_INITIALIZED,
            ApiError::BadRequest(msg)
            | ApiError::GenerationFailed(msg)
            | ApiError::StorageFailed(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::ModelUnavailable => {
                tracing::error!(error = MODEL_NOT_INITIALIZED, "Generation requested without a model");
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Invalid generation request");
            }
            ApiError::GenerationFailed(msg) => {
                tracing::error!(error = %msg, "Error during generation");
            }
            ApiError::StorageFailed(msg) => {
                tracing::error!(error = %msg, "Error saving generated audio");
            }
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(self.message())),
        )
            .into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::GatewayUnavailable => ApiError::ModelUnavailable,
            GenerationError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            GenerationError::GenerationFailed(msg) => ApiError::GenerationFailed(msg),
            GenerationError::PersistenceFailed(msg) => ApiError::StorageFailed(msg),
        }
    }
}
