// 系统领域管理器
//
// 负责配置读写

use std::sync::Arc;

use crate::models::{AppConfig, ScreenshotOptions};
use crate::settings::SettingsManager;

/// 系统领域管理器 - 负责配置
#[derive(Clone)]
pub struct SystemDomain {
    settings: Arc<SettingsManager>,
}

impl SystemDomain {
    /// 创建新的系统领域管理器
    pub fn new(settings: Arc<SettingsManager>) -> Self {
        Self { settings }
    }

    /// 获取配置管理器
    pub fn get_settings(&self) -> &Arc<SettingsManager> {
        &self.settings
    }

    /// 当前配置快照
    pub async fn config(&self) -> AppConfig {
        self.settings.get().await
    }

    /// 由当前配置得到的默认截图参数
    pub async fn default_options(&self) -> ScreenshotOptions {
        self.settings.get().await.capture.default_options()
    }
}
