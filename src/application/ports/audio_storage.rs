//! Audio Storage Port - 出站端口
//!
//! 生成结果以平面文件形式持久化，服务本身从不清理

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Waveform;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// 已写入的音频文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
    /// 文件名，如 generated_music_20240102_030405.wav
    pub file_name: String,
    /// 磁盘路径
    pub path: PathBuf,
    /// 对外可访问的 URL 路径
    pub public_path: String,
}

/// Audio Storage Port - 出站端口
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 按生成时间（秒级精度）得到文件名，同一秒内会重名
    fn file_name_for(&self, generated_at: DateTime<Local>) -> String;

    /// 写入波形，目录不存在时自动创建；同名文件直接覆盖
    async fn save_waveform(
        &self,
        waveform: Waveform,
        generated_at: DateTime<Local>,
    ) -> Result<StoredAudio, AudioStorageError>;
}
