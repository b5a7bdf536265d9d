// 截图缓存 - 保存最近一次成功编码的截图
//
// 单槽缓存，所有读取方共享。写入时整体替换，读取时复制出不可变句柄，
// 锁只在替换或复制的瞬间持有，截图和编码期间不持锁。

use crate::error::ScreenshotError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::trace;

/// 已编码的截图及其截取时间
#[derive(Clone, PartialEq, Eq)]
pub struct CachedImage {
    /// PNG 字节
    pub bytes: Bytes,
    /// 截取时间
    pub captured_at: DateTime<Utc>,
}

impl CachedImage {
    pub fn new(bytes: impl Into<Bytes>, captured_at: DateTime<Utc>) -> Self {
        Self {
            bytes: bytes.into(),
            captured_at,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for CachedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedImage")
            .field("bytes", &self.bytes.len())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

/// 截图缓存
///
/// 状态只有两种：空（启动后尚无成功截图）和有图。
#[derive(Default)]
pub struct ScreenshotCache {
    slot: RwLock<Option<CachedImage>>,
}

impl ScreenshotCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 发布新截图，整体替换旧截图
    pub async fn publish(&self, image: CachedImage) {
        let size = image.len();
        let captured_at = image.captured_at;
        *self.slot.write().await = Some(image);
        trace!("截图缓存已更新: {} 字节 @ {}", size, captured_at);
    }

    /// 读取最近一次截图
    ///
    /// 缓存为空时返回 `NotAvailable`。
    pub async fn latest(&self) -> Result<CachedImage, ScreenshotError> {
        self.slot
            .read()
            .await
            .clone()
            .ok_or(ScreenshotError::NotAvailable)
    }

    /// 是否已有截图
    pub async fn is_fresh(&self) -> bool {
        self.slot.read().await.is_some()
    }
}
