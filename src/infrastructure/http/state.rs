//! Application State
//!
//! 进程内唯一的模型句柄在 main 中构造后注入

use std::sync::Arc;

use crate::application::{AudioStoragePort, GenerateMusicHandler, MusicGeneratorPort};

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub generate_music_handler: GenerateMusicHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `generator` 为 None 表示模型启动时初始化失败
    pub fn new(
        generator: Option<Arc<dyn MusicGeneratorPort>>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            generate_music_handler: GenerateMusicHandler::new(generator, storage),
        }
    }
}
