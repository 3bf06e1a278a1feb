//! 应用层错误定义
//!
//! 一次生成请求的失败分类

use thiserror::Error;

use crate::application::ports::{AudioStorageError, GatewayError};
use crate::domain::MusicError;

/// 模型未初始化时返回的固定信息
pub const MODEL_NOT_INITIALIZED: &str = "Model not initialized properly";

/// 生成请求错误
///
/// 所有变体的 Display 都是直接返回给调用方的原始信息
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 模型网关启动时初始化失败
    #[error("Model not initialized properly")]
    GatewayUnavailable,

    /// 请求体无法解析或参数无法转换
    #[error("{0}")]
    InvalidRequest(String),

    /// 模型推理失败
    #[error("{0}")]
    GenerationFailed(String),

    /// 音频文件写入失败
    #[error("{0}")]
    PersistenceFailed(String),
}

impl GenerationError {
    /// 错误类别（用于日志字段）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GatewayUnavailable => "gateway_unavailable",
            Self::InvalidRequest(_) => "invalid_request",
            Self::GenerationFailed(_) => "generation_failed",
            Self::PersistenceFailed(_) => "persistence_failed",
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl From<GatewayError> for GenerationError {
    fn from(err: GatewayError) -> Self {
        Self::GenerationFailed(err.to_string())
    }
}

impl From<AudioStorageError> for GenerationError {
    fn from(err: AudioStorageError) -> Self {
        Self::PersistenceFailed(err.to_string())
    }
}

impl From<MusicError> for GenerationError {
    fn from(err: MusicError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_is_fixed() {
        assert_eq!(
            GenerationError::GatewayUnavailable.to_string(),
            MODEL_NOT_INITIALIZED
        );
    }

    #[test]
    fn test_gateway_error_keeps_raw_message() {
        let err: GenerationError = GatewayError::Inference("CUDA out of memory".to_string()).into();
        assert_eq!(err.kind(), "generation_failed");
        assert_eq!(err.to_string(), "CUDA out of memory");
    }

    #[test]
    fn test_storage_error_maps_to_persistence_failed() {
        let err: GenerationError = AudioStorageError::IoError("disk full".to_string()).into();
        assert!(matches!(err, GenerationError::PersistenceFailed(_)));
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
