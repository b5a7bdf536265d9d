// 截屏调度器 - 实时模式下的定时截屏任务
//
// 启动时立即截图一次，之后按固定间隔截图并发布到缓存。
// 单次失败只记录日志，不影响后续周期；收到停止信号后退出。

use super::CaptureOrchestrator;
use crate::settings::SettingsManager;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, trace};

/// tokio 的 interval 不接受零间隔
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// 截屏调度器
pub struct CaptureScheduler {
    /// 截图编排器
    orchestrator: Arc<CaptureOrchestrator>,
    /// 每个周期读取最新的默认截图参数
    settings: Arc<SettingsManager>,
    /// 截屏间隔
    capture_interval: Duration,
}

impl CaptureScheduler {
    /// 创建新的调度器
    pub fn new(
        orchestrator: Arc<CaptureOrchestrator>,
        settings: Arc<SettingsManager>,
        capture_interval: Duration,
    ) -> Self {
        Self {
            orchestrator,
            settings,
            capture_interval,
        }
    }

    /// 启动截屏任务
    ///
    /// `shutdown` 变为 true（或发送端被丢弃）时任务结束，正在进行的周期会先完成。
    pub fn start(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let period = self.capture_interval.max(MIN_INTERVAL);
        info!("准备启动实时截屏任务，间隔: {:?}", period);

        tokio::spawn(async move {
            // 第一次 tick 立即完成，即启动后马上截图
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                if *shutdown.borrow() {
                    break;
                }

                tokio::select! {
                    biased;
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                }
            }

            info!("实时截屏任务已停止");
        })
    }

    /// 执行一个截图周期，失败只记录日志
    async fn run_once(&self) {
        let defaults = self.settings.get().await.capture.default_options();

        match self.orchestrator.run_cycle(defaults).await {
            Ok(image) => {
                trace!("自动截屏成功: {} 字节 @ {}", image.len(), image.captured_at);
            }
            Err(e) => {
                error!("自动截屏失败: {}", e);
            }
        }
    }
}
