//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_storage;
mod music_generator;

pub use audio_storage::{AudioStorageError, AudioStoragePort, StoredAudio};
pub use music_generator::{GatewayError, MusicGeneratorPort, SynthesisRequest};
