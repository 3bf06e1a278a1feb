//! Generate Commands - 音乐生成命令

use std::path::PathBuf;

use crate::domain::{ComputeDevice, Description, DurationSecs};

/// 生成音乐命令
#[derive(Debug, Clone, Default)]
pub struct GenerateMusic {
    pub description: Description,
    pub duration: DurationSecs,
}

/// 生成音乐响应
#[derive(Debug, Clone)]
pub struct GenerateMusicResponse {
    pub file_name: String,
    pub path: PathBuf,
    /// 对外 URL 路径，如 /static/generated/generated_music_20240102_030405.wav
    pub public_path: String,
    pub sample_rate: u32,
    pub channels: u16,
    /// 实际输出时长，可能与请求时长不同
    pub duration_secs: f64,
    pub device: ComputeDevice,
}
