// 命令行参数与测试截图模式

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::capture::ScreenCapture;
use crate::models::ScreenshotOptions;
use crate::processing;
use crate::utils::timestamped_screenshot_path;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// 桌面监控摄像头：通过 HTTP 提供最新的桌面截图
#[derive(Parser, Debug)]
#[command(name = "desktop-camera", version)]
pub struct Cli {
    /// 配置文件路径，不存在时自动创建默认配置
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// 测试截图功能：截取整个屏幕保存为 PNG 后退出
    #[arg(long)]
    pub test: bool,
}

/// 截取整个虚拟屏幕并保存到 `dir` 下带时间戳的 PNG 文件
pub async fn save_test_screenshot(capture: Arc<ScreenCapture>, dir: &Path) -> Result<PathBuf> {
    info!("正在测试截图功能...");

    let png = tokio::task::spawn_blocking(move || {
        let raw = capture.capture(None)?;
        processing::render(&raw, &ScreenshotOptions::full_screen())
    })
    .await
    .context("截图任务异常退出")?
    .context("截图失败")?;

    let path = timestamped_screenshot_path(dir, chrono::Local::now());
    tokio::fs::write(&path, &png)
        .await
        .with_context(|| format!("保存截图失败: {}", path.display()))?;

    let path = std::fs::canonicalize(&path).unwrap_or(path);
    info!("截图成功保存至: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::backend::fake::FakeDisplay;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["desktop-camera"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.test);
    }

    #[test]
    fn test_flags() {
        let cli =
            Cli::try_parse_from(["desktop-camera", "--config", "my.json", "--test"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("my.json"));
        assert!(cli.test);
    }

    #[test]
    fn test_version_flag_is_handled_by_clap() {
        let err = Cli::try_parse_from(["desktop-camera", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[tokio::test]
    async fn test_save_test_screenshot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let capture = Arc::new(ScreenCapture::with_backend(Arc::new(FakeDisplay::single(
            40, 30,
        ))));

        let path = save_test_screenshot(capture, dir.path()).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("screenshot_") && name.ends_with(".png"));

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[tokio::test]
    async fn test_save_test_screenshot_reports_capture_failure() {
        let dir = tempfile::tempdir().unwrap();
        let display = Arc::new(FakeDisplay::single(40, 30));
        display.set_failing(true);
        let capture = Arc::new(ScreenCapture::with_backend(display));

        assert!(save_test_screenshot(capture, dir.path()).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
