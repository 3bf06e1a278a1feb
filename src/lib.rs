//! musegen - 文本生成音乐服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Music Context: 描述、时长、生成预算、波形
//!
//! 应用层 (application/):
//! - Ports: MusicGeneratorPort（模型网关）、AudioStoragePort
//! - Commands: GenerateMusic 及其处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: POST /generate + 静态文件
//! - Adapters: 推理服务客户端、假模型、WAV 编解码、文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
