// 截屏模块 - 负责解析截图区域并从屏幕复制像素

use crate::error::ScreenshotError;
use crate::models::{ScreenRegion, VirtualScreenBounds};
use std::sync::Arc;
use tracing::{debug, trace};

pub mod backend;
pub mod options;
pub mod orchestrator;
pub mod scheduler;

pub use backend::{DisplayBackend, ScreenshotsBackend, BYTES_PER_PIXEL};
pub use options::CaptureOverrides;
pub use orchestrator::CaptureOrchestrator;
pub use scheduler::CaptureScheduler;

/// 原始截图数据
///
/// 按行自上而下，每像素 4 字节，顺序为 B,G,R,A。
#[derive(Clone, PartialEq, Eq)]
pub struct RawCapture {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for RawCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCapture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// 截屏管理器
pub struct ScreenCapture {
    backend: Arc<dyn DisplayBackend>,
}

impl ScreenCapture {
    /// 使用默认平台后端创建
    pub fn new() -> Self {
        Self::with_backend(Arc::new(ScreenshotsBackend::new()))
    }

    pub fn with_backend(backend: Arc<dyn DisplayBackend>) -> Self {
        Self { backend }
    }

    /// 查询虚拟屏幕边界
    ///
    /// 多显示器查询结果为零时回退到主显示器，原点为 (0, 0)。
    pub fn screen_bounds(&self) -> Result<VirtualScreenBounds, ScreenshotError> {
        match self.backend.virtual_bounds()? {
            Some(bounds) if !bounds.is_empty() => Ok(bounds),
            _ => {
                let primary = self.backend.primary_bounds()?;
                debug!(
                    "虚拟屏幕查询为空，回退到主屏幕 {}x{}",
                    primary.width, primary.height
                );
                Ok(VirtualScreenBounds::primary(primary.width, primary.height))
            }
        }
    }

    /// 截取屏幕
    ///
    /// `region` 为 None 时截取整个虚拟屏幕；否则区域坐标相对于虚拟屏幕原点。
    pub fn capture(&self, region: Option<&ScreenRegion>) -> Result<RawCapture, ScreenshotError> {
        let bounds = self.screen_bounds()?;
        let rect = match region {
            Some(region) => resolve_region(region, &bounds)?,
            None => bounds.as_region(),
        };
        if rect.is_empty() {
            return Err(ScreenshotError::invalid_region(&rect));
        }

        let mut data = vec![0u8; rect.pixel_count() * BYTES_PER_PIXEL];
        self.backend.copy_rect(&rect, &mut data)?;

        trace!(
            "截屏成功: {}x{} @ ({}, {})",
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
        Ok(RawCapture {
            width: rect.width as u32,
            height: rect.height as u32,
            data,
        })
    }
}

impl Default for ScreenCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// 把相对虚拟屏幕原点的区域转换为绝对坐标并裁剪到边界内
pub fn resolve_region(
    region: &ScreenRegion,
    bounds: &VirtualScreenBounds,
) -> Result<ScreenRegion, ScreenshotError> {
    let translated = ScreenRegion::new(
        region.x.saturating_add(bounds.origin_x),
        region.y.saturating_add(bounds.origin_y),
        region.width,
        region.height,
    );
    clamp_region(&translated, bounds).ok_or_else(|| ScreenshotError::invalid_region(region))
}

/// 将绝对坐标区域裁剪到虚拟屏幕内
///
/// 结果是区域与边界的交集；交集为空时返回 None。
/// 已经在边界内的区域原样返回。
pub fn clamp_region(region: &ScreenRegion, bounds: &VirtualScreenBounds) -> Option<ScreenRegion> {
    let left = bounds.origin_x as i64;
    let top = bounds.origin_y as i64;
    let right = left + bounds.width as i64;
    let bottom = top + bounds.height as i64;

    let x = (region.x as i64).max(left);
    let y = (region.y as i64).max(top);
    let width = (region.x as i64 + region.width as i64).min(right) - x;
    let height = (region.y as i64 + region.height as i64).min(bottom) - y;

    if width <= 0 || height <= 0 {
        return None;
    }
    Some(ScreenRegion::new(
        x as i32,
        y as i32,
        width as i32,
        height as i32,
    ))
}
