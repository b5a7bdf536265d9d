//! HTTP 接口模块
//!
//! 按功能分组：
//! - query: 截图读取、预览、屏幕信息
//! - config: 配置读取与更新

pub mod config;
pub mod query;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::ScreenshotError;
use crate::AppState;

/// 接口错误
#[derive(Debug)]
pub enum AppError {
    /// 请求参数或请求体无效
    BadRequest(String),
    /// 截图流程失败
    Screenshot(ScreenshotError),
    /// 其他内部错误（配置保存等）
    Internal(anyhow::Error),
}

impl From<ScreenshotError> for AppError {
    fn from(e: ScreenshotError) -> Self {
        AppError::Screenshot(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(msg) => {
                warn!("请求无效: {}", msg);
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg)
            }
            AppError::Screenshot(ScreenshotError::NotAvailable) => (
                StatusCode::NOT_FOUND,
                "NOT_AVAILABLE",
                ScreenshotError::NotAvailable.to_string(),
            ),
            AppError::Screenshot(e) => {
                error!("截图请求失败: {}", e);
                let code = if e.is_capture_failure() {
                    "CAPTURE_FAILED"
                } else if let ScreenshotError::EncodeFailed(_) = e {
                    "ENCODE_FAILED"
                } else {
                    "CAPTURE_UNAVAILABLE"
                };
                (StatusCode::INTERNAL_SERVER_ERROR, code, e.to_string())
            }
            AppError::Internal(e) => {
                error!("内部错误: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    format!("{:#}", e),
                )
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": { "code": code, "message": message } })),
        )
            .into_response()
    }
}

/// 构建 HTTP 路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/last", get(query::get_last))
        .route("/preview", get(query::get_preview))
        .route("/screen-info", get(query::get_screen_info))
        .route("/config", get(config::get_config).post(config::update_config))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
