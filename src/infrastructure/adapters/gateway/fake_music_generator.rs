//! Fake Music Generator - 用于测试的模型网关
//!
//! 不加载任何模型，按预算渲染一段正弦波；也可以配置成总是失败

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::ports::{GatewayError, MusicGeneratorPort, SynthesisRequest};
use crate::domain::{ComputeDevice, Waveform};

/// Fake Music Generator 配置
#[derive(Debug, Clone)]
pub struct FakeMusicGeneratorConfig {
    /// 输出采样率
    pub sample_rate: u32,
    /// 输出声道数
    pub channels: u16,
    /// 正弦波频率（Hz）
    pub frequency_hz: f32,
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
    /// 单次最多渲染的时长（秒），超出时返回推理错误
    pub max_duration_secs: u64,
}

impl Default for FakeMusicGeneratorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 32000,
            channels: 1,
            frequency_hz: 440.0,
            latency_ms: 0,
            max_duration_secs: 3600,
        }
    }
}

/// Fake Music Generator
///
/// 输出时长 = 预算 / TOKENS_PER_SECOND 秒，非正预算输出空波形
pub struct FakeMusicGenerator {
    config: FakeMusicGeneratorConfig,
    /// 设置后每次合成都返回该错误信息
    failure: Option<String>,
    /// 收到的所有请求
    requests: Mutex<Vec<SynthesisRequest>>,
}

impl FakeMusicGenerator {
    pub fn new(config: FakeMusicGeneratorConfig) -> Self {
        tracing::info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            "FakeMusicGenerator initialized"
        );
        Self {
            config,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeMusicGeneratorConfig::default())
    }

    /// 总是失败的生成器
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::with_defaults()
        }
    }

    /// 到目前为止收到的请求
    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn render(&self, secs: f64) -> Result<Vec<f32>, GatewayError> {
        if secs > self.config.max_duration_secs as f64 {
            return Err(GatewayError::Inference(format!(
                "Requested {:.0}s of audio exceeds the {}s render limit",
                secs, self.config.max_duration_secs
            )));
        }

        let frames = (secs * self.config.sample_rate as f64).round() as usize;
        let channels = self.config.channels as usize;
        let len = frames.checked_mul(channels).ok_or_else(|| {
            GatewayError::Inference(format!(
                "Sample count overflow: {} frames x {} channels",
                frames, channels
            ))
        })?;

        let mut samples = Vec::new();
        samples.try_reserve_exact(len).map_err(|e| {
            GatewayError::Inference(format!("Cannot allocate {} samples: {}", len, e))
        })?;

        let step = 2.0 * std::f32::consts::PI * self.config.frequency_hz
            / self.config.sample_rate as f32;
        for frame in 0..frames {
            let value = 0.2 * (step * frame as f32).sin();
            samples.extend(std::iter::repeat(value).take(channels));
        }
        Ok(samples)
    }
}

#[async_trait]
impl MusicGeneratorPort for FakeMusicGenerator {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Waveform, GatewayError> {
        tracing::debug!(
            description_len = request.description.char_count(),
            max_length = request.budget.tokens(),
            "FakeMusicGenerator: rendering tone"
        );

        let secs = request.budget.approx_secs();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(message) = &self.failure {
            return Err(GatewayError::Inference(message.clone()));
        }

        let samples = self.render(secs)?;
        Waveform::new(samples, self.config.channels, self.config.sample_rate)
            .map_err(|e| GatewayError::Inference(e.to_string()))
    }

    fn device(&self) -> ComputeDevice {
        ComputeDevice::Cpu
    }

    fn model_id(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Description, DurationSecs};

    fn request(secs: i64) -> SynthesisRequest {
        SynthesisRequest {
            description: Description::new("test tone"),
            budget: DurationSecs::new(secs).budget(),
        }
    }

    #[tokio::test]
    async fn test_output_length_follows_budget() {
        let generator = FakeMusicGenerator::new(FakeMusicGeneratorConfig {
            sample_rate: 8000,
            channels: 2,
            ..Default::default()
        });

        let waveform = generator.synthesize(request(3)).await.unwrap();

        assert_eq!(waveform.sample_rate(), 8000);
        assert_eq!(waveform.channels(), 2);
        assert_eq!(waveform.frames(), 24000);
    }

    #[tokio::test]
    async fn test_non_positive_budget_yields_empty_waveform() {
        let generator = FakeMusicGenerator::with_defaults();
        assert!(generator.synthesize(request(0)).await.unwrap().is_empty());
        assert!(generator.synthesize(request(-2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_generator_reports_message_and_records_request() {
        let generator = FakeMusicGenerator::failing("model exploded");

        let err = generator.synthesize(request(1)).await.unwrap_err();

        assert_eq!(err.to_string(), "model exploded");
        assert_eq!(generator.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_huge_budget_is_an_error_not_a_panic() {
        let generator = FakeMusicGenerator::with_defaults();

        let err = generator.synthesize(request(i64::MAX)).await.unwrap_err();

        assert!(matches!(err, GatewayError::Inference(_)));
        assert!(err.to_string().contains("render limit"));
    }

    #[tokio::test]
    async fn test_render_limit_is_inclusive() {
        let generator = FakeMusicGenerator::new(FakeMusicGeneratorConfig {
            sample_rate: 100,
            max_duration_secs: 2,
            ..Default::default()
        });

        assert_eq!(generator.synthesize(request(2)).await.unwrap().frames(), 200);
        assert!(generator.synthesize(request(3)).await.is_err());
    }
}
