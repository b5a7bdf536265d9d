// 日志初始化 - 同时输出到控制台和按天轮转的日志文件

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::utils::get_log_dir;

/// 日志文件名前缀
const LOG_FILE_NAME: &str = "app.log";

/// 初始化日志系统
///
/// 返回的 guard 必须在整个进程生命周期内持有，丢弃后文件日志停止写入。
pub fn init() -> Result<WorkerGuard> {
    let log_dir = get_log_dir();

    // 创建日志目录
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("创建日志目录失败: {}", log_dir.display()))?;

    // 配置日志输出到文件（每天轮转）
    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // 同时输出到控制台和文件
    let writer = std::io::stdout.and(non_blocking);

    // 使用本地时区
    let timer = LocalTime::new(time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(writer)
        .with_timer(timer)
        .with_ansi(cfg!(debug_assertions)) // release 版本不使用颜色代码
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("设置全局日志订阅者失败")?;

    eprintln!("日志文件位置: {:?}", log_dir);
    Ok(guard)
}
