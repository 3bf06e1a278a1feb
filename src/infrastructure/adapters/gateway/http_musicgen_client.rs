//! HTTP MusicGen Client - 调用托管预训练模型的推理服务
//!
//! 实现 MusicGeneratorPort trait
//!
//! 推理服务 API:
//! GET  http://localhost:8000/health
//! Response: {"status": "ok", "cuda_available": true}
//! POST http://localhost:8000/api/musicgen/generate
//! Request: {"model": "...", "text": ["..."], "max_length": 500, "do_sample": true, "device": "cuda"}
//! Response: audio/wav binary

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{GatewayError, MusicGeneratorPort, SynthesisRequest};
use crate::domain::{ComputeDevice, DevicePreference, Waveform};
use crate::infrastructure::adapters::codec::decode_wav;

/// 生成请求体 (JSON)
#[derive(Debug, Serialize)]
struct GenerateHttpRequest<'a> {
    model: &'a str,
    /// 批量文本，这里始终只有一条
    text: Vec<&'a str>,
    max_length: i64,
    do_sample: bool,
    device: &'static str,
}

/// 健康检查响应
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    #[serde(default)]
    cuda_available: bool,
}

/// HTTP MusicGen 客户端配置
#[derive(Debug, Clone)]
pub struct HttpMusicGenClientConfig {
    /// 推理服务基础 URL
    pub base_url: String,
    /// 预训练模型标识
    pub model_id: String,
    /// 设备偏好
    pub device: DevicePreference,
    /// 生成请求超时（秒），0 表示不限制
    pub timeout_secs: u64,
}

impl Default for HttpMusicGenClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            model_id: "facebook/musicgen-small".to_string(),
            device: DevicePreference::Auto,
            timeout_secs: 0,
        }
    }
}

impl HttpMusicGenClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }
}

/// HTTP MusicGen 客户端
///
/// 设备在 connect 时确定一次，之后每个请求都使用同一设备
pub struct HttpMusicGenClient {
    client: Client,
    config: HttpMusicGenClientConfig,
    device: ComputeDevice,
}

impl HttpMusicGenClient {
    /// 连接推理服务并完成初始化
    ///
    /// 推理服务不可达或未就绪时返回 `GatewayError::Initialization`
    pub async fn connect(config: HttpMusicGenClientConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Initialization(e.to_string()))?;

        tracing::info!(
            url = %config.base_url,
            model = %config.model_id,
            "Loading MusicGen model and processor..."
        );

        let health = Self::fetch_health(&client, &config).await?;
        let device = config.device.resolve(health.cuda_available);

        if device.is_accelerated() {
            tracing::info!("CUDA is available, running generation on GPU");
        } else {
            if config.device == DevicePreference::Cuda {
                tracing::warn!("CUDA requested but not available, falling back to CPU");
            }
            tracing::info!("Running on CPU mode - generation might be slower");
        }

        tracing::info!(device = %device, "Model loaded successfully");

        Ok(Self {
            client,
            config,
            device,
        })
    }

    async fn fetch_health(
        client: &Client,
        config: &HttpMusicGenClientConfig,
    ) -> Result<HealthResponse, GatewayError> {
        let url = format!("{}/health", config.base_url);
        let response = client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| {
                GatewayError::Initialization(format!("Cannot reach inference service: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Initialization(format!(
                "Health check returned HTTP {}",
                status
            )));
        }

        let health: HealthResponse = response.json().await.map_err(|e| {
            GatewayError::Initialization(format!("Invalid health response: {}", e))
        })?;

        if health.status != "ok" {
            return Err(GatewayError::Initialization(format!(
                "Inference service not ready: {}",
                health.status
            )));
        }

        Ok(health)
    }

    /// 获取生成 URL
    fn generate_url(&self) -> String {
        format!("{}/api/musicgen/generate", self.config.base_url)
    }
}

#[async_trait]
impl MusicGeneratorPort for HttpMusicGenClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Waveform, GatewayError> {
        let http_request = GenerateHttpRequest {
            model: &self.config.model_id,
            text: vec![request.description.as_str()],
            max_length: request.budget.tokens(),
            do_sample: true,
            device: self.device.as_str(),
        };

        tracing::debug!(
            url = %self.generate_url(),
            max_length = http_request.max_length,
            "Sending generate request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .json(&http_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else if e.is_connect() {
                    GatewayError::NetworkError(format!(
                        "Cannot connect to inference service: {}",
                        e
                    ))
                } else {
                    GatewayError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        let waveform =
            decode_wav(&audio_data).map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            sample_rate = waveform.sample_rate(),
            channels = waveform.channels(),
            audio_size = audio_data.len(),
            "Inference completed"
        );

        Ok(waveform)
    }

    fn device(&self) -> ComputeDevice {
        self.device
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Description, DurationSecs};
    use crate::infrastructure::adapters::codec::encode_pcm16;
    use axum::{
        http::{header, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Captured = Arc<Mutex<Vec<serde_json::Value>>>;

    /// 在随机端口上启动一个假的推理服务
    async fn spawn_stub(cuda_available: bool, fail_generate: bool) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();

        let app = Router::new()
            .route(
                "/health",
                get(move || async move {
                    Json(serde_json::json!({"status": "ok", "cuda_available": cuda_available}))
                }),
            )
            .route(
                "/api/musicgen/generate",
                post(move |Json(body): Json<serde_json::Value>| async move {
                    sink.lock().unwrap().push(body);
                    if fail_generate {
                        return (StatusCode::INTERNAL_SERVER_ERROR, "CUDA out of memory")
                            .into_response();
                    }
                    let waveform = Waveform::mono(vec![0.25; 3200], 32000).unwrap();
                    ([(header::CONTENT_TYPE, "audio/wav")], encode_pcm16(&waveform))
                        .into_response()
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn request(description: &str, secs: i64) -> SynthesisRequest {
        SynthesisRequest {
            description: Description::new(description),
            budget: DurationSecs::new(secs).budget(),
        }
    }

    #[test]
    fn test_config_default() {
        let config = HttpMusicGenClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.model_id, "facebook/musicgen-small");
        assert_eq!(config.timeout_secs, 0);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpMusicGenClientConfig::new("http://example.com:9000")
            .with_timeout(60)
            .with_device(DevicePreference::Cpu);
        assert_eq!(config.base_url, "http://example.com:9000");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.device, DevicePreference::Cpu);
    }

    #[tokio::test]
    async fn test_connect_resolves_device_from_health() {
        let (url, _) = spawn_stub(true, false).await;
        let client = HttpMusicGenClient::connect(HttpMusicGenClientConfig::new(&url))
            .await
            .unwrap();
        assert_eq!(client.device(), ComputeDevice::Cuda);

        let (url, _) = spawn_stub(false, false).await;
        let client = HttpMusicGenClient::connect(HttpMusicGenClientConfig::new(&url))
            .await
            .unwrap();
        assert_eq!(client.device(), ComputeDevice::Cpu);
    }

    #[tokio::test]
    async fn test_connect_fails_when_service_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result =
            HttpMusicGenClient::connect(HttpMusicGenClientConfig::new(format!("http://{}", addr)))
                .await;
        assert!(matches!(result, Err(GatewayError::Initialization(_))));
    }

    #[tokio::test]
    async fn test_synthesize_sends_budget_and_decodes_wav() {
        let (url, captured) = spawn_stub(false, false).await;
        let client = HttpMusicGenClient::connect(HttpMusicGenClientConfig::new(&url))
            .await
            .unwrap();

        let waveform = client.synthesize(request("lofi beats", 4)).await.unwrap();

        assert_eq!(waveform.sample_rate(), 32000);
        assert_eq!(waveform.frames(), 3200);

        let bodies = captured.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["max_length"], 200);
        assert_eq!(bodies[0]["text"][0], "lofi beats");
        assert_eq!(bodies[0]["device"], "cpu");
        assert_eq!(bodies[0]["do_sample"], true);
    }

    #[tokio::test]
    async fn test_service_error_carries_body() {
        let (url, _) = spawn_stub(true, true).await;
        let client = HttpMusicGenClient::connect(HttpMusicGenClientConfig::new(&url))
            .await
            .unwrap();

        let err = client.synthesize(request("metal", 1)).await.unwrap_err();

        assert!(matches!(err, GatewayError::ServiceError(_)));
        assert!(err.to_string().contains("CUDA out of memory"));
    }
}
