//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（MusicGenerator、AudioStorage）
//! - commands: 生成命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{handlers::GenerateMusicHandler, GenerateMusic, GenerateMusicResponse};

pub use error::{GenerationError, MODEL_NOT_INITIALIZED};

pub use ports::{
    AudioStorageError, AudioStoragePort, GatewayError, MusicGeneratorPort, StoredAudio,
    SynthesisRequest,
};
