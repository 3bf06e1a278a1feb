//! Music Generator Port - 文本生成音乐的模型网关抽象
//!
//! 预训练模型本身是外部能力：给定文本和长度预算，返回波形和采样率。
//! 具体实现在 infrastructure/adapters/gateway

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ComputeDevice, Description, GenerationBudget, Waveform};

/// 模型网关错误
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Model initialization failed: {0}")]
    Initialization(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 推理过程内部抛出的错误，保留原始信息
    #[error("{0}")]
    Inference(String),
}

/// 合成请求
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// 音乐描述，原样传给模型
    pub description: Description,
    /// 生成长度预算（token）
    pub budget: GenerationBudget,
}

/// Music Generator Port
///
/// 进程内唯一的模型句柄，启动时构造一次，之后只做推理
#[async_trait]
pub trait MusicGeneratorPort: Send + Sync {
    /// 执行一次文本到音频的合成
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Waveform, GatewayError>;

    /// 启动时确定的推理设备
    fn device(&self) -> ComputeDevice;

    /// 模型标识（用于日志）
    fn model_id(&self) -> &str;
}
