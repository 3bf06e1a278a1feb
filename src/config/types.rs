//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::DevicePreference;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 模型网关配置
    #[serde(default)]
    pub model: ModelConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 模型后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// 外部推理服务
    #[default]
    Http,
    /// 进程内假模型
    Fake,
}

impl std::fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelBackend::Http => write!(f, "http"),
            ModelBackend::Fake => write!(f, "fake"),
        }
    }
}

/// 模型网关配置
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// 后端类型
    #[serde(default)]
    pub backend: ModelBackend,

    /// 推理服务基础 URL
    #[serde(default = "default_model_url")]
    pub url: String,

    /// 预训练模型标识
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// 设备偏好: auto, cuda, cpu
    #[serde(default)]
    pub device: DevicePreference,

    /// 生成请求超时（秒），0 表示不限制
    #[serde(default)]
    pub timeout_secs: u64,

    /// 假模型输出采样率
    #[serde(default = "default_fake_sample_rate")]
    pub fake_sample_rate: u32,

    /// 假模型单次最多渲染的时长（秒）
    #[serde(default = "default_fake_max_duration_secs")]
    pub fake_max_duration_secs: u64,
}

fn default_model_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_model_id() -> String {
    "facebook/musicgen-small".to_string()
}

fn default_fake_sample_rate() -> u32 {
    32000 // musicgen 的输出采样率
}

fn default_fake_max_duration_secs() -> u64 {
    3600
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            url: default_model_url(),
            model_id: default_model_id(),
            device: DevicePreference::default(),
            timeout_secs: 0,
            fake_sample_rate: default_fake_sample_rate(),
            fake_max_duration_secs: default_fake_max_duration_secs(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 静态文件目录，挂载在 /static
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// 生成音频所在的子目录
    #[serde(default = "default_generated_subdir")]
    pub generated_subdir: String,

    /// 首页文件
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_generated_subdir() -> String {
    "generated".to_string()
}

fn default_index_file() -> PathBuf {
    PathBuf::from("templates/index.html")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            generated_subdir: default_generated_subdir(),
            index_file: default_index_file(),
        }
    }
}

impl StorageConfig {
    /// 生成音频的磁盘目录
    pub fn generated_dir(&self) -> PathBuf {
        self.static_dir.join(&self.generated_subdir)
    }

    /// 生成音频的 URL 前缀
    pub fn public_prefix(&self) -> String {
        format!("/static/{}", self.generated_subdir.trim_matches('/'))
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
