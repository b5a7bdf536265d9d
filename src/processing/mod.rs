// 图像处理模块 - 像素重排、双线性缩放与 PNG 编码

use crate::capture::{RawCapture, BYTES_PER_PIXEL};
use crate::error::ScreenshotError;
use crate::models::ScreenshotOptions;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};

/// 8 位通道扩展到 16 位的系数（0xFF * 257 = 0xFFFF）
const WIDEN: f64 = 257.0;

/// 把原始 BGRA 数据转换为 RGBA 图像
///
/// 数据不足的像素保持为全零。
pub fn to_image(raw: &RawCapture) -> RgbaImage {
    let mut img = RgbaImage::new(raw.width, raw.height);
    let width = raw.width as usize;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let offset = (y as usize * width + x as usize) * BYTES_PER_PIXEL;
        if let Some(&[b, g, r, a]) = raw.data.get(offset..offset + BYTES_PER_PIXEL) {
            *pixel = Rgba([r, g, b, a]);
        }
    }

    img
}

/// 缩放计划：目标尺寸与缩放比例
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizePlan {
    width: u32,
    height: u32,
    scale: f64,
}

/// 计算保持宽高比的缩放计划，不需要缩放时返回 None
///
/// 小于等于 0 的上限视为不限制。
fn plan_resize(width: u32, height: u32, max_width: i32, max_height: i32) -> Option<ResizePlan> {
    if max_width <= 0 && max_height <= 0 {
        return None;
    }
    if width == 0 || height == 0 {
        return None;
    }

    let max_w = if max_width > 0 { max_width as u64 } else { width as u64 };
    let max_h = if max_height > 0 { max_height as u64 } else { height as u64 };
    let (w, h) = (width as u64, height as u64);

    if w <= max_w && h <= max_h {
        return None;
    }

    // scale = min(max_w / w, max_h / h)；目标尺寸用整数运算，避免浮点截断少一像素
    let (new_w, new_h, scale) = if max_w * h <= max_h * w {
        (max_w, h * max_w / w, max_w as f64 / w as f64)
    } else {
        (w * max_h / h, max_h, max_h as f64 / h as f64)
    };

    Some(ResizePlan {
        width: new_w.max(1) as u32,
        height: new_h.max(1) as u32,
        scale,
    })
}

/// 等比缩放后的目标尺寸，不需要缩放时返回 None
pub fn target_size(width: u32, height: u32, max_width: i32, max_height: i32) -> Option<(u32, u32)> {
    plan_resize(width, height, max_width, max_height).map(|plan| (plan.width, plan.height))
}

/// 按上限等比缩放（双线性插值）
///
/// 不需要缩放时原样返回。
pub fn resize(img: RgbaImage, max_width: i32, max_height: i32) -> RgbaImage {
    let (width, height) = img.dimensions();
    let Some(plan) = plan_resize(width, height, max_width, max_height) else {
        return img;
    };

    let scale = plan.scale;
    let max_x = width - 1;
    let max_y = height - 1;

    RgbaImage::from_fn(plan.width, plan.height, |x, y| {
        let src_x = x as f64 / scale;
        let src_y = y as f64 / scale;

        let x1 = (src_x.floor() as u32).min(max_x);
        let y1 = (src_y.floor() as u32).min(max_y);
        let x2 = (x1 + 1).min(max_x);
        let y2 = (y1 + 1).min(max_y);

        let dx = (src_x - x1 as f64).clamp(0.0, 1.0);
        let dy = (src_y - y1 as f64).clamp(0.0, 1.0);

        let p11 = img.get_pixel(x1, y1).0;
        let p21 = img.get_pixel(x2, y1).0;
        let p12 = img.get_pixel(x1, y2).0;
        let p22 = img.get_pixel(x2, y2).0;

        let mut out = [0u8; 4];
        for channel in 0..4 {
            let widen = |p: [u8; 4]| p[channel] as f64 * WIDEN;
            let value = (1.0 - dx) * (1.0 - dy) * widen(p11)
                + dx * (1.0 - dy) * widen(p21)
                + (1.0 - dx) * dy * widen(p12)
                + dx * dy * widen(p22);
            // 先取整到 16 位，再截断回 8 位
            let wide = value.round().clamp(0.0, u16::MAX as f64) as u32;
            out[channel] = (wide / WIDEN as u32) as u8;
        }
        Rgba(out)
    })
}

/// PNG 编码
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, ScreenshotError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .map_err(|e| ScreenshotError::EncodeFailed(e.to_string()))?;
    Ok(buffer)
}

/// 原始截图 → PNG 字节，按参数决定是否缩放
pub fn render(raw: &RawCapture, options: &ScreenshotOptions) -> Result<Vec<u8>, ScreenshotError> {
    let img = to_image(raw);
    let img = if options.wants_resize() {
        resize(img, options.max_width, options.max_height)
    } else {
        img
    };
    encode_png(&img)
}
