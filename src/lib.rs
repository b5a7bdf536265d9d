// 桌面监控摄像头 - 通过 HTTP 提供最新的桌面截图

pub mod capture;
pub mod cli;
pub mod commands;
pub mod domains;
pub mod error;
pub mod logger;
pub mod models;
pub mod processing;
pub mod settings;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use capture::{CaptureOrchestrator, CaptureScheduler, DisplayBackend, ScreenCapture, ScreenshotsBackend};
use cli::Cli;
use domains::{CaptureDomain, SystemDomain};
use models::{CaptureConfig, CaptureMode};
use settings::SettingsManager;
use storage::ScreenshotCache;

/// 应用状态 - 按领域组织
#[derive(Clone)]
pub struct AppState {
    /// 捕获领域管理器
    pub capture_domain: Arc<CaptureDomain>,
    /// 系统领域管理器
    pub system_domain: Arc<SystemDomain>,
}

impl AppState {
    /// 组装各领域组件
    ///
    /// 运行模式和截图间隔取自启动时的 `capture` 配置。
    pub fn new(
        settings: Arc<SettingsManager>,
        backend: Arc<dyn DisplayBackend>,
        capture_config: &CaptureConfig,
    ) -> Self {
        let capture = Arc::new(ScreenCapture::with_backend(backend));
        let cache = Arc::new(ScreenshotCache::new());
        let orchestrator = Arc::new(CaptureOrchestrator::new(capture, cache));
        let scheduler = Arc::new(CaptureScheduler::new(
            orchestrator.clone(),
            settings.clone(),
            capture_config.interval,
        ));

        Self {
            capture_domain: Arc::new(CaptureDomain::new(
                capture_config.mode,
                orchestrator,
                scheduler,
            )),
            system_domain: Arc::new(SystemDomain::new(settings)),
        }
    }
}

/// 程序入口
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // guard 需持有到进程结束
    let _log_guard = logger::init()?;
    info!("桌面监控摄像头 v{} 启动", env!("CARGO_PKG_VERSION"));

    if cli.test {
        let capture = Arc::new(ScreenCapture::new());
        let path = cli::save_test_screenshot(capture, std::path::Path::new(".")).await?;
        println!("截图成功保存至: {}", path.display());
        return Ok(());
    }

    let settings = Arc::new(
        SettingsManager::load(cli.config.clone())
            .await
            .context("加载配置文件失败")?,
    );
    let config = settings.get().await;
    validate(&config)?;

    let state = AppState::new(
        settings,
        Arc::new(ScreenshotsBackend::new()),
        &config.capture,
    );

    // 实时截屏任务的停止信号
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let capture_task = state.capture_domain.start_realtime(shutdown_rx);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("监听地址失败: {}", addr))?;

    info!("服务已启动: http://{}", addr);
    info!("运行模式: {}", config.capture.mode);
    if config.capture.mode == CaptureMode::Realtime {
        info!(
            "截图间隔: {}",
            utils::format_duration(config.capture.interval)
        );
    }

    let served = axum::serve(listener, commands::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // 无论服务如何退出，都通知后台任务停止
    let _ = shutdown_tx.send(true);
    if let Some(handle) = capture_task {
        if let Err(e) = handle.await {
            error!("实时截屏任务异常退出: {}", e);
        }
    }

    served.context("HTTP 服务异常退出")?;
    info!("服务已关闭");
    Ok(())
}

fn validate(config: &models::AppConfig) -> Result<()> {
    utils::validate_config(config).map_err(|e| anyhow!("配置无效: {}", e))
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("监听 Ctrl-C 失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("监听 SIGTERM 失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("正在关闭服务器...");
}
