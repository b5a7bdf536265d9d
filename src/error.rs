// 截图流程错误类型

use crate::models::ScreenRegion;

/// 截图、处理、缓存读取过程中可能出现的错误
///
/// 任何一种错误都不会修改缓存中上一次成功的截图。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScreenshotError {
    /// 当前平台完全不具备截屏能力
    #[error("截图功能在当前平台不可用: {0}")]
    CaptureUnavailable(String),

    /// 底层截屏调用失败
    #[error("截图失败: {0}")]
    CaptureFailed(String),

    /// 裁剪后的区域宽或高不为正
    #[error("截图区域无效: ({x}, {y}) {width}x{height}")]
    InvalidRegion {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// 图像编码失败
    #[error("图像编码失败: {0}")]
    EncodeFailed(String),

    /// 自启动以来还没有任何一次成功的截图
    #[error("暂无可用截图")]
    NotAvailable,
}

impl ScreenshotError {
    pub fn invalid_region(region: &ScreenRegion) -> Self {
        Self::InvalidRegion {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        }
    }

    /// 无效区域与截屏失败按同一类处理
    pub fn is_capture_failure(&self) -> bool {
        matches!(self, Self::CaptureFailed(_) | Self::InvalidRegion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_region_counts_as_capture_failure() {
        let err = ScreenshotError::invalid_region(&ScreenRegion::new(5, 5, 0, 10));
        assert!(err.is_capture_failure());
        assert!(err.to_string().contains("0x10"));
        assert!(ScreenshotError::CaptureFailed("x".into()).is_capture_failure());
        assert!(!ScreenshotError::NotAvailable.is_capture_failure());
        assert!(!ScreenshotError::EncodeFailed("x".into()).is_capture_failure());
    }
}
