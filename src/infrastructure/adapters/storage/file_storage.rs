//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{AudioStorageError, AudioStoragePort, StoredAudio};
use crate::domain::Waveform;
use crate::infrastructure::adapters::codec::write_wav;

/// 文件名前缀
const FILE_PREFIX: &str = "generated_music_";

/// 文件名时间戳格式（秒级）
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 文件系统音频存储
pub struct FileAudioStorage {
    /// 生成文件目录
    generated_dir: PathBuf,
    /// 对外 URL 前缀，如 /static/generated
    public_prefix: String,
}

impl FileAudioStorage {
    /// 创建新的文件存储
    pub async fn new(
        generated_dir: impl AsRef<Path>,
        public_prefix: impl Into<String>,
    ) -> Result<Self, AudioStorageError> {
        let generated_dir = generated_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&generated_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        Ok(Self {
            generated_dir,
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    fn file_name_for(&self, generated_at: DateTime<Local>) -> String {
        format!(
            "{}{}.wav",
            FILE_PREFIX,
            generated_at.format(TIMESTAMP_FORMAT)
        )
    }

    async fn save_waveform(
        &self,
        waveform: Waveform,
        generated_at: DateTime<Local>,
    ) -> Result<StoredAudio, AudioStorageError> {
        // 目录可能在运行期间被删除
        fs::create_dir_all(&self.generated_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        let file_name = self.file_name_for(generated_at);
        let path = self.generated_dir.join(&file_name);

        let target = path.clone();
        let frames = waveform.frames();
        tokio::task::spawn_blocking(move || write_wav(&target, &waveform))
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?
            .map_err(|e| AudioStorageError::EncodingError(e.to_string()))?;

        tracing::debug!(
            "Saved audio: file={}, frames={}",
            path.display(),
            frames
        );

        Ok(StoredAudio {
            public_path: self.public_path(&file_name),
            file_name,
            path,
        })
    }
}
