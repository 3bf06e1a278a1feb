//! Waveform - 模型输出的音频波形

use super::MusicError;

/// 音频波形
///
/// 不变量:
/// - channels >= 1, sample_rate > 0
/// - samples 为交错排列的 f32，长度是 channels 的整数倍
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self, MusicError> {
        if channels == 0 {
            return Err(MusicError::InvalidWaveform(
                "channel count must be at least 1".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(MusicError::InvalidWaveform(
                "sample rate must be positive".to_string(),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(MusicError::InvalidWaveform(format!(
                "{} samples cannot be split into {} channels",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// 单声道波形
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, MusicError> {
        Self::new(samples, 1, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// 每声道的采样帧数
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}
