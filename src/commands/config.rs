//! 配置管理接口
//!
//! `GET /config` 返回当前配置；`POST /config[?save=true]` 整体替换配置。
//! 区域与压缩设置从下一次截图起生效，模式与间隔需重启后生效。

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Json;
use tracing::info;

use super::AppError;
use crate::models::AppConfig;
use crate::utils::{format_duration, validate_config};
use crate::AppState;

/// 获取应用配置
pub async fn get_config(State(state): State<AppState>) -> Json<AppConfig> {
    Json(state.system_domain.config().await)
}

/// 更新配置
pub async fn update_config(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let config: AppConfig = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("无效的 JSON: {}", e)))?;
    validate_config(&config).map_err(AppError::BadRequest)?;

    let persist = params.get("save").map(String::as_str) == Some("true");
    let settings = state.system_domain.get_settings();
    let previous = settings.get().await;

    settings
        .update(config.clone(), persist)
        .await
        .map_err(AppError::Internal)?;

    if previous.capture.mode != config.capture.mode
        || previous.capture.interval != config.capture.interval
    {
        info!(
            "捕获模式/间隔已更新为 {} / {}，重启后生效（当前运行模式: {}）",
            config.capture.mode,
            format_duration(config.capture.interval),
            state.capture_domain.mode()
        );
    }

    Ok(Json(serde_json::json!({ "status": "success" })))
}
