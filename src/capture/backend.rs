// 平台截屏后端 - 与操作系统显示子系统交互
//
// 截屏引擎只通过 DisplayBackend 访问屏幕，便于在测试中替换。
// 默认实现基于 screenshots crate，支持 Windows / macOS / Linux(X11)。

use crate::error::ScreenshotError;
use crate::models::{ScreenRegion, VirtualScreenBounds};
use image::{imageops, RgbaImage};
use screenshots::Screen;
use tracing::{debug, trace};

/// 每像素字节数（B,G,R,A）
pub const BYTES_PER_PIXEL: usize = 4;

/// 平台截屏能力
pub trait DisplayBackend: Send + Sync {
    /// 所有活动显示器的外接矩形；查询结果为零时返回 None
    fn virtual_bounds(&self) -> Result<Option<VirtualScreenBounds>, ScreenshotError>;

    /// 主显示器尺寸，原点固定为 (0, 0)
    fn primary_bounds(&self) -> Result<VirtualScreenBounds, ScreenshotError>;

    /// 把虚拟屏幕坐标系中的矩形复制到 `dst`
    ///
    /// `dst` 长度为 `width * height * 4`，按行自上而下、B,G,R,A 顺序填充。
    /// 实现内部申请的任何原生资源都必须在返回前释放。
    fn copy_rect(&self, rect: &ScreenRegion, dst: &mut [u8]) -> Result<(), ScreenshotError>;
}

/// 基于 screenshots crate 的截屏后端
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenshotsBackend;

impl ScreenshotsBackend {
    pub fn new() -> Self {
        Self
    }

    fn screens(&self) -> Result<Vec<Screen>, ScreenshotError> {
        let screens =
            Screen::all().map_err(|e| ScreenshotError::CaptureUnavailable(e.to_string()))?;
        if screens.is_empty() {
            return Err(ScreenshotError::CaptureUnavailable(
                "未检测到任何屏幕".to_string(),
            ));
        }
        Ok(screens)
    }
}

impl DisplayBackend for ScreenshotsBackend {
    fn virtual_bounds(&self) -> Result<Option<VirtualScreenBounds>, ScreenshotError> {
        let screens = self.screens()?;

        let min_x = screens.iter().map(|s| s.display_info.x as i64).min().unwrap_or(0);
        let min_y = screens.iter().map(|s| s.display_info.y as i64).min().unwrap_or(0);
        let max_x = screens
            .iter()
            .map(|s| s.display_info.x as i64 + s.display_info.width as i64)
            .max()
            .unwrap_or(min_x);
        let max_y = screens
            .iter()
            .map(|s| s.display_info.y as i64 + s.display_info.height as i64)
            .max()
            .unwrap_or(min_y);

        let width = (max_x - min_x).clamp(0, i32::MAX as i64) as i32;
        let height = (max_y - min_y).clamp(0, i32::MAX as i64) as i32;

        if width == 0 || height == 0 {
            return Ok(None);
        }

        trace!(
            "虚拟屏幕: {}x{} @ ({}, {})，共 {} 个屏幕",
            width,
            height,
            min_x,
            min_y,
            screens.len()
        );
        Ok(Some(VirtualScreenBounds::new(
            min_x as i32,
            min_y as i32,
            width,
            height,
        )))
    }

    fn primary_bounds(&self) -> Result<VirtualScreenBounds, ScreenshotError> {
        let screens = self.screens()?;
        let primary = screens
            .iter()
            .find(|s| s.display_info.is_primary)
            .or_else(|| screens.first())
            .ok_or_else(|| ScreenshotError::CaptureUnavailable("未找到主屏幕".to_string()))?;

        let info = primary.display_info;
        Ok(VirtualScreenBounds::primary(
            info.width.min(i32::MAX as u32) as i32,
            info.height.min(i32::MAX as u32) as i32,
        ))
    }

    fn copy_rect(&self, rect: &ScreenRegion, dst: &mut [u8]) -> Result<(), ScreenshotError> {
        if rect.is_empty() {
            return Err(ScreenshotError::invalid_region(rect));
        }
        if dst.len() < rect.pixel_count() * BYTES_PER_PIXEL {
            return Err(ScreenshotError::CaptureFailed(format!(
                "目标缓冲区过小: {} 字节",
                dst.len()
            )));
        }

        let mut copied_any = false;

        for (index, screen) in self.screens()?.iter().enumerate() {
            let info = screen.display_info;
            let screen_rect = ScreenRegion::new(
                info.x,
                info.y,
                info.width.min(i32::MAX as u32) as i32,
                info.height.min(i32::MAX as u32) as i32,
            );
            let Some(part) = intersect(rect, &screen_rect) else {
                continue;
            };

            let width = part.width as u32;
            let height = part.height as u32;

            // 截图在本作用域结束时释放，无论成功与否
            let shot = screen
                .capture_area(part.x - info.x, part.y - info.y, width, height)
                .map_err(|e| {
                    ScreenshotError::CaptureFailed(format!("截取屏幕 #{} 失败: {}", index, e))
                })?;

            // 高分屏返回物理像素，缩放回逻辑尺寸
            let shot = if shot.width() != width || shot.height() != height {
                debug!(
                    "屏幕 #{} 返回 {}x{}，缩放至 {}x{}",
                    index,
                    shot.width(),
                    shot.height(),
                    width,
                    height
                );
                imageops::resize(&shot, width, height, imageops::FilterType::Triangle)
            } else {
                shot
            };

            blit_rgba_as_bgra(&shot, rect, &part, dst);
            copied_any = true;
        }

        if !copied_any {
            return Err(ScreenshotError::CaptureFailed(
                "截图区域不在任何屏幕范围内".to_string(),
            ));
        }
        Ok(())
    }
}

/// 两个矩形的交集，空交集返回 None
fn intersect(a: &ScreenRegion, b: &ScreenRegion) -> Option<ScreenRegion> {
    let left = (a.x as i64).max(b.x as i64);
    let top = (a.y as i64).max(b.y as i64);
    let right = (a.x as i64 + a.width as i64).min(b.x as i64 + b.width as i64);
    let bottom = (a.y as i64 + a.height as i64).min(b.y as i64 + b.height as i64);

    if right <= left || bottom <= top {
        return None;
    }
    Some(ScreenRegion::new(
        left as i32,
        top as i32,
        (right - left) as i32,
        (bottom - top) as i32,
    ))
}

/// 把 RGBA 截图写入目标缓冲区中 `part` 对应的位置，同时转换为 BGRA
fn blit_rgba_as_bgra(shot: &RgbaImage, target: &ScreenRegion, part: &ScreenRegion, dst: &mut [u8]) {
    let target_width = target.width as usize;
    let offset_x = (part.x - target.x) as usize;
    let offset_y = (part.y - target.y) as usize;

    for (x, y, pixel) in shot.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let index = ((offset_y + y as usize) * target_width + offset_x + x as usize) * BYTES_PER_PIXEL;
        if let Some(slot) = dst.get_mut(index..index + BYTES_PER_PIXEL) {
            slot.copy_from_slice(&[b, g, r, a]);
        }
    }
}
