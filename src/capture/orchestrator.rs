// 截图编排器 - 执行一次完整的 截屏 → 处理 → 编码 → 发布 流程
//
// 按需请求和实时模式的后台任务共用同一个 run_cycle，
// 只有全部步骤成功时才会替换缓存。

use super::options::{self, CaptureOverrides};
use super::ScreenCapture;
use crate::error::ScreenshotError;
use crate::models::{CaptureMode, ScreenshotOptions};
use crate::processing;
use crate::storage::{CachedImage, ScreenshotCache};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// 截图编排器
pub struct CaptureOrchestrator {
    /// 截屏管理器
    capture: Arc<ScreenCapture>,
    /// 最近截图缓存
    cache: Arc<ScreenshotCache>,
}

impl CaptureOrchestrator {
    pub fn new(capture: Arc<ScreenCapture>, cache: Arc<ScreenshotCache>) -> Self {
        Self { capture, cache }
    }

    /// 获取截屏管理器
    pub fn capture(&self) -> &Arc<ScreenCapture> {
        &self.capture
    }

    /// 获取缓存
    pub fn cache(&self) -> &Arc<ScreenshotCache> {
        &self.cache
    }

    /// 截图并编码，不写入缓存
    ///
    /// 截屏、缩放、编码都是阻塞操作，放到阻塞线程池中执行。
    pub async fn take(&self, options: ScreenshotOptions) -> Result<CachedImage, ScreenshotError> {
        let capture = self.capture.clone();
        let captured_at = Utc::now();

        let bytes = tokio::task::spawn_blocking(move || {
            let raw = capture.capture(options.region.as_ref())?;
            processing::render(&raw, &options)
        })
        .await
        .map_err(|e| ScreenshotError::CaptureFailed(format!("截图任务异常退出: {}", e)))??;

        Ok(CachedImage::new(bytes, captured_at))
    }

    /// 执行一次截图周期并发布到缓存
    ///
    /// 失败时缓存保持不变，错误原样返回给调用方。
    pub async fn run_cycle(&self, options: ScreenshotOptions) -> Result<CachedImage, ScreenshotError> {
        let image = self.take(options).await?;
        self.cache.publish(image.clone()).await;
        debug!("截图周期完成: {} 字节", image.len());
        Ok(image)
    }

    /// 处理一次读取请求
    ///
    /// - 按需模式：每次读取都同步截图，返回本次结果
    /// - 实时模式：无覆盖参数时直接读缓存；带覆盖参数时同步截图一次并发布
    pub async fn serve(
        &self,
        mode: CaptureMode,
        defaults: &ScreenshotOptions,
        overrides: &CaptureOverrides,
    ) -> Result<CachedImage, ScreenshotError> {
        let resolved = options::resolve(defaults, overrides);

        match mode {
            CaptureMode::OnDemand => self.run_cycle(resolved).await,
            CaptureMode::Realtime if overrides.is_empty() => self.cache.latest().await,
            CaptureMode::Realtime => self.run_cycle(resolved).await,
        }
    }
}
