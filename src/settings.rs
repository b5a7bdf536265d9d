use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::info;

use crate::models::AppConfig;

pub struct SettingsManager {
    path: PathBuf,
    data: RwLock<AppConfig>,
}

impl SettingsManager {
    /// 加载配置文件，不存在时写入默认配置
    pub async fn load(path: PathBuf) -> Result<Self> {
        let initial = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<AppConfig>(&bytes)
                .with_context(|| format!("解析配置文件失败: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let default = AppConfig::default();
                write_config(&path, &default).await?;
                info!("已创建默认配置文件: {}", path.display());
                default
            }
            Err(e) => {
                return Err(e).with_context(|| format!("读取配置文件失败: {}", path.display()))
            }
        };

        Ok(Self {
            path,
            data: RwLock::new(initial),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> AppConfig {
        self.data.read().await.clone()
    }

    /// 整体替换配置，`persist` 为 true 时同时写回文件
    pub async fn update(&self, update: AppConfig, persist: bool) -> Result<AppConfig> {
        let mut config = self.data.write().await;
        *config = update;

        if persist {
            write_config(&self.path, &config).await?;
            info!("配置已保存到 {}", self.path.display());
        }
        Ok(config.clone())
    }

    pub async fn save(&self) -> Result<()> {
        let config = self.data.read().await;
        write_config(&self.path, &config).await
    }
}

async fn write_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaptureMode, ScreenRegion};
    use std::time::Duration;

    #[tokio::test]
    async fn test_missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let settings = SettingsManager::load(path.clone()).await.unwrap();
        assert_eq!(settings.get().await, AppConfig::default());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["server"]["port"], 9981);
        assert_eq!(written["capture"]["mode"], "ondemand");
        assert_eq!(written["capture"]["interval"], "5s");
    }

    #[tokio::test]
    async fn test_existing_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "server": {"host": "127.0.0.1", "port": 8080},
                "capture": {
                    "mode": "realtime",
                    "interval": "1m30s",
                    "region": {"x": 10, "y": 20, "width": 300, "height": 200}
                }
            }"#,
        )
        .unwrap();

        let config = SettingsManager::load(path).await.unwrap().get().await;
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.capture.mode, CaptureMode::Realtime);
        assert_eq!(config.capture.interval, Duration::from_secs(90));
        assert_eq!(config.capture.region, Some(ScreenRegion::new(10, 20, 300, 200)));
        // 未写出的压缩配置取默认值
        assert!(!config.capture.compression.enabled);
        assert_eq!(config.capture.compression.max_width, 1920);
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(SettingsManager::load(path.clone()).await.is_err());

        std::fs::write(&path, r#"{"capture": {"mode": "sometimes"}}"#).unwrap();
        assert!(SettingsManager::load(path).await.is_err());
    }

    #[tokio::test]
    async fn test_update_persists_only_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let settings = SettingsManager::load(path.clone()).await.unwrap();

        let mut changed = settings.get().await;
        changed.capture.compression.enabled = true;

        settings.update(changed.clone(), false).await.unwrap();
        assert_eq!(settings.get().await, changed);
        let on_disk = SettingsManager::load(path.clone()).await.unwrap().get().await;
        assert_eq!(on_disk, AppConfig::default());

        settings.update(changed.clone(), true).await.unwrap();
        let on_disk = SettingsManager::load(path).await.unwrap().get().await;
        assert_eq!(on_disk, changed);
    }
}
