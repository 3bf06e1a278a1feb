//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Music Context: 文本描述 → 音乐片段

pub mod music;

pub use music::{
    ComputeDevice, Description, DevicePreference, DurationSecs, GenerationBudget, MusicError,
    Waveform, DEFAULT_DURATION_SECS, TOKENS_PER_SECOND,
};
