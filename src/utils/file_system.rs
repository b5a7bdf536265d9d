//! 文件系统操作工具
//!
//! 提供跨平台的日志目录定位和截图文件命名

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// 应用目录名
const APP_DIR_NAME: &str = "desktop-camera";

/// 获取日志目录路径（跨平台）
///
/// - macOS: ~/Library/Logs/desktop-camera
/// - Windows: %APPDATA%/desktop-camera/logs
/// - Linux: ~/.local/share/desktop-camera/logs
pub fn get_log_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join("Library/Logs").join(APP_DIR_NAME)
    } else if cfg!(target_os = "windows") {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join(APP_DIR_NAME).join("logs")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join(".local/share")
            .join(APP_DIR_NAME)
            .join("logs")
    }
}

/// 生成带时间戳的截图文件路径，例如 `screenshot_20240101_120000.png`
pub fn timestamped_screenshot_path(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("screenshot_{}.png", now.format("%Y%m%d_%H%M%S")))
}
