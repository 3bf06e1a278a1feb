//! Model Gateway Adapters
//!
//! - HttpMusicGenClient: 调用托管预训练模型的推理服务
//! - FakeMusicGenerator: 进程内假模型（测试、本地联调）

mod fake_music_generator;
mod http_musicgen_client;

use std::sync::Arc;

pub use fake_music_generator::{FakeMusicGenerator, FakeMusicGeneratorConfig};
pub use http_musicgen_client::{HttpMusicGenClient, HttpMusicGenClientConfig};

use crate::application::ports::{GatewayError, MusicGeneratorPort};
use crate::config::{ModelBackend, ModelConfig};

/// 按配置构造进程内唯一的模型网关
///
/// 失败时由调用方决定是否以"模型不可用"状态继续运行
pub async fn build_generator(
    config: &ModelConfig,
) -> Result<Arc<dyn MusicGeneratorPort>, GatewayError> {
    match config.backend {
        ModelBackend::Http => {
            let client_config = HttpMusicGenClientConfig {
                base_url: config.url.clone(),
                model_id: config.model_id.clone(),
                device: config.device,
                timeout_secs: config.timeout_secs,
            };
            let client = HttpMusicGenClient::connect(client_config).await?;
            Ok(Arc::new(client))
        }
        ModelBackend::Fake => {
            let generator = FakeMusicGenerator::new(FakeMusicGeneratorConfig {
                sample_rate: config.fake_sample_rate,
                max_duration_secs: config.fake_max_duration_secs,
                ..Default::default()
            });
            Ok(Arc::new(generator))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_fake_backend() {
        let config = ModelConfig {
            backend: ModelBackend::Fake,
            fake_sample_rate: 16000,
            ..Default::default()
        };
        let generator = build_generator(&config).await.unwrap();
        assert_eq!(generator.model_id(), "fake");
    }

    #[tokio::test]
    async fn test_build_http_backend_fails_without_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ModelConfig {
            url: format!("http://{}", addr),
            ..Default::default()
        };
        let result = build_generator(&config).await;
        assert!(matches!(result, Err(GatewayError::Initialization(_))));
    }
}
