//! Generate Command Handlers
//!
//! 单次同步生成请求的生命周期：校验 → 推理 → 写文件 → 响应

use chrono::Local;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::commands::{GenerateMusic, GenerateMusicResponse};
use crate::application::error::GenerationError;
use crate::application::ports::{AudioStoragePort, MusicGeneratorPort, SynthesisRequest};

/// GenerateMusic Handler
///
/// generator 为 None 表示模型在启动时初始化失败
pub struct GenerateMusicHandler {
    generator: Option<Arc<dyn MusicGeneratorPort>>,
    storage: Arc<dyn AudioStoragePort>,
}

impl GenerateMusicHandler {
    pub fn new(
        generator: Option<Arc<dyn MusicGeneratorPort>>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self { generator, storage }
    }

    pub fn is_ready(&self) -> bool {
        self.generator.is_some()
    }

    /// 模型不可用时立即失败，调用方应在解析请求体之前调用
    pub fn ensure_ready(&self) -> Result<&Arc<dyn MusicGeneratorPort>, GenerationError> {
        self.generator
            .as_ref()
            .ok_or(GenerationError::GatewayUnavailable)
    }

    pub async fn handle(
        &self,
        command: GenerateMusic,
    ) -> Result<GenerateMusicResponse, GenerationError> {
        let generator = self.ensure_ready()?;
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("generate_music", %request_id);

        async move {
            let budget = command.duration.budget();

            tracing::info!(
                description = %command.description,
                duration = command.duration.as_secs(),
                max_length = budget.tokens(),
                device = %generator.device(),
                "Generating music"
            );

            // 时长不做上下限校验，只记录
            if !command.duration.is_positive() {
                tracing::warn!(
                    duration = command.duration.as_secs(),
                    "Non-positive duration forwarded to the model unchanged"
                );
            }

            let waveform = generator
                .synthesize(SynthesisRequest {
                    description: command.description,
                    budget,
                })
                .await?;

            let sample_rate = waveform.sample_rate();
            let channels = waveform.channels();
            let duration_secs = waveform.duration_secs();

            tracing::info!(
                sample_rate,
                channels,
                frames = waveform.frames(),
                "Saving generated audio"
            );

            let stored = self.storage.save_waveform(waveform, Local::now()).await?;

            tracing::info!(
                file = %stored.path.display(),
                duration_secs,
                "Generation completed"
            );

            Ok(GenerateMusicResponse {
                file_name: stored.file_name,
                path: stored.path,
                public_path: stored.public_path,
                sample_rate,
                channels,
                duration_secs,
                device: generator.device(),
            })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AudioStorageError, StoredAudio};
    use crate::domain::{Description, DurationSecs, Waveform};
    use crate::infrastructure::adapters::{FakeMusicGenerator, FakeMusicGeneratorConfig};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// 只记录写入内容的存储
    #[derive(Default)]
    struct RecordingStorage {
        saved: Mutex<Vec<Waveform>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl AudioStoragePort for RecordingStorage {
        fn file_name_for(&self, generated_at: DateTime<Local>) -> String {
            format!("generated_music_{}.wav", generated_at.format("%Y%m%d_%H%M%S"))
        }

        async fn save_waveform(
            &self,
            waveform: Waveform,
            generated_at: DateTime<Local>,
        ) -> Result<StoredAudio, AudioStorageError> {
            if let Some(message) = &self.fail_with {
                return Err(AudioStorageError::IoError(message.clone()));
            }
            let file_name = self.file_name_for(generated_at);
            self.saved.lock().unwrap().push(waveform);
            Ok(StoredAudio {
                public_path: format!("/static/generated/{}", file_name),
                path: PathBuf::from("memory").join(&file_name),
                file_name,
            })
        }
    }

    fn command(description: &str, secs: i64) -> GenerateMusic {
        GenerateMusic {
            description: Description::new(description),
            duration: DurationSecs::new(secs),
        }
    }

    fn fake_generator() -> Arc<FakeMusicGenerator> {
        Arc::new(FakeMusicGenerator::new(FakeMusicGeneratorConfig {
            sample_rate: 8000,
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn test_unavailable_gateway_short_circuits() {
        let storage = Arc::new(RecordingStorage::default());
        let handler = GenerateMusicHandler::new(None, storage.clone());

        assert!(!handler.is_ready());
        let err = handler.handle(command("lofi", 5)).await.unwrap_err();
        assert!(matches!(err, GenerationError::GatewayUnavailable));
        assert!(storage.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_persists_waveform_at_model_rate() {
        let generator = fake_generator();
        let storage = Arc::new(RecordingStorage::default());
        let handler = GenerateMusicHandler::new(Some(generator.clone()), storage.clone());

        let response = handler.handle(command("calm piano", 2)).await.unwrap();

        assert_eq!(response.sample_rate, 8000);
        assert!(response.public_path.starts_with("/static/generated/generated_music_"));
        assert!(response.public_path.ends_with(".wav"));
        let saved = storage.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].sample_rate(), 8000);
    }

    #[tokio::test]
    async fn test_budget_forwarded_proportional_to_duration() {
        let generator = fake_generator();
        let storage = Arc::new(RecordingStorage::default());
        let handler = GenerateMusicHandler::new(Some(generator.clone()), storage);

        handler.handle(command("drums", 1)).await.unwrap();
        handler.handle(command("drums", 2)).await.unwrap();

        let requests = generator.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].budget.tokens(), 50);
        assert_eq!(requests[1].budget.tokens(), requests[0].budget.tokens() * 2);
    }

    #[tokio::test]
    async fn test_empty_description_forwarded_as_is() {
        let generator = fake_generator();
        let handler =
            GenerateMusicHandler::new(Some(generator.clone()), Arc::new(RecordingStorage::default()));

        handler.handle(command("", 1)).await.unwrap();

        assert_eq!(generator.requests()[0].description.as_str(), "");
    }

    #[tokio::test]
    async fn test_model_failure_writes_nothing() {
        let generator = Arc::new(FakeMusicGenerator::failing("CUDA out of memory"));
        let storage = Arc::new(RecordingStorage::default());
        let handler = GenerateMusicHandler::new(Some(generator), storage.clone());

        let err = handler.handle(command("metal", 3)).await.unwrap_err();

        assert!(matches!(err, GenerationError::GenerationFailed(_)));
        assert_eq!(err.to_string(), "CUDA out of memory");
        assert!(storage.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_persistence_failed() {
        let storage = Arc::new(RecordingStorage {
            fail_with: Some("read-only file system".to_string()),
            ..Default::default()
        });
        let handler = GenerateMusicHandler::new(Some(fake_generator()), storage);

        let err = handler.handle(command("jazz", 1)).await.unwrap_err();

        assert!(matches!(err, GenerationError::PersistenceFailed(_)));
        assert!(err.to_string().contains("read-only file system"));
    }

    #[tokio::test]
    async fn test_negative_duration_is_not_rejected() {
        let generator = fake_generator();
        let handler =
            GenerateMusicHandler::new(Some(generator.clone()), Arc::new(RecordingStorage::default()));

        let response = handler.handle(command("ambient", -5)).await.unwrap();

        assert_eq!(generator.requests()[0].budget.tokens(), -250);
        assert_eq!(response.duration_secs, 0.0);
    }
}
