// 存储模块 - 截图的内存缓存

pub mod cache;

pub use cache::{CachedImage, ScreenshotCache};
