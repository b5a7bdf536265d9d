// 捕获领域管理器
//
// 负责屏幕截取、截图读取和实时调度相关的功能
// 运行模式在启动时确定，运行期间不再改变

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::capture::{CaptureOrchestrator, CaptureOverrides, CaptureScheduler, ScreenCapture};
use crate::error::ScreenshotError;
use crate::models::{CaptureMode, ScreenshotOptions, VirtualScreenBounds};
use crate::storage::CachedImage;

/// 捕获领域管理器 - 负责屏幕截取和调度
#[derive(Clone)]
pub struct CaptureDomain {
    mode: CaptureMode,
    capture: Arc<ScreenCapture>,
    orchestrator: Arc<CaptureOrchestrator>,
    scheduler: Arc<CaptureScheduler>,
}

impl CaptureDomain {
    /// 创建新的捕获领域管理器
    pub fn new(
        mode: CaptureMode,
        orchestrator: Arc<CaptureOrchestrator>,
        scheduler: Arc<CaptureScheduler>,
    ) -> Self {
        Self {
            mode,
            capture: orchestrator.capture().clone(),
            orchestrator,
            scheduler,
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// 获取截屏管理器
    pub fn get_capture(&self) -> &Arc<ScreenCapture> {
        &self.capture
    }

    /// 获取截图编排器
    pub fn get_orchestrator(&self) -> &Arc<CaptureOrchestrator> {
        &self.orchestrator
    }

    /// 获取调度器
    pub fn get_scheduler(&self) -> &Arc<CaptureScheduler> {
        &self.scheduler
    }

    /// 实时模式下启动定时截屏任务，按需模式返回 None
    pub fn start_realtime(&self, shutdown: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        match self.mode {
            CaptureMode::Realtime => Some(self.scheduler.clone().start(shutdown)),
            CaptureMode::OnDemand => {
                info!("按需模式，仅在请求时截图");
                None
            }
        }
    }

    /// 读取截图（/last）
    pub async fn latest(
        &self,
        defaults: &ScreenshotOptions,
        overrides: &CaptureOverrides,
    ) -> Result<CachedImage, ScreenshotError> {
        self.orchestrator.serve(self.mode, defaults, overrides).await
    }

    /// 预览截图：整屏压缩到 800x600 以内，不写入缓存
    pub async fn preview(&self) -> Result<CachedImage, ScreenshotError> {
        self.orchestrator.take(ScreenshotOptions::preview()).await
    }

    /// 当前虚拟屏幕边界
    pub async fn screen_info(&self) -> Result<VirtualScreenBounds, ScreenshotError> {
        let capture = self.capture.clone();
        tokio::task::spawn_blocking(move || capture.screen_bounds())
            .await
            .map_err(|e| ScreenshotError::CaptureFailed(format!("查询屏幕信息异常退出: {}", e)))?
    }
}
