//! 输入验证工具函数
//!
//! 启动时和通过 /config 修改配置时都会调用，防止无效配置进入运行状态

use crate::models::{AppConfig, CaptureMode};
use std::time::Duration;
use tracing::warn;

/// 间隔低于该值时给出性能警告
const MIN_RECOMMENDED_INTERVAL: Duration = Duration::from_secs(1);

/// 验证应用配置
///
/// # 参数
/// - `config`: 待验证的配置
///
/// # 返回
/// - `Ok(())`: 验证通过
/// - `Err(String)`: 错误信息
pub fn validate_config(config: &AppConfig) -> Result<(), String> {
    if config.server.port == 0 {
        return Err(format!("无效的端口号: {}", config.server.port));
    }

    if config.capture.mode == CaptureMode::Realtime && config.capture.interval.is_zero() {
        return Err("实时模式下截图间隔必须大于 0".to_string());
    }

    if config.capture.interval < MIN_RECOMMENDED_INTERVAL {
        warn!(
            "截图间隔过短 ({})，可能会影响性能",
            super::duration::format_duration(config.capture.interval)
        );
    }

    Ok(())
}
