//! Music Context - 音乐生成限界上下文
//!
//! 职责:
//! - 生成请求的值对象（描述、时长、token 预算）
//! - 模型输出的波形表示

mod errors;
mod value_objects;
mod waveform;

pub use errors::MusicError;
pub use value_objects::{
    ComputeDevice, Description, DevicePreference, DurationSecs, GenerationBudget,
    DEFAULT_DURATION_SECS, TOKENS_PER_SECOND,
};
pub use waveform::Waveform;
