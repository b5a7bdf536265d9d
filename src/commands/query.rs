//! 截图读取接口
//!
//! - `/last`: 最新截图，支持区域与压缩覆盖参数
//! - `/preview`: 整屏缩略预览，不写入缓存
//! - `/screen-info`: 虚拟屏幕边界

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};

use super::AppError;
use crate::capture::CaptureOverrides;
use crate::models::VirtualScreenBounds;
use crate::storage::CachedImage;
use crate::AppState;

const CONTENT_TYPE_PNG: &str = "image/png";
const NO_CACHE: &str = "no-cache, no-store, must-revalidate";
/// HTTP 日期格式（RFC 7231，固定 GMT）
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// 获取最新截图
pub async fn get_last(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let overrides = CaptureOverrides::from_query(&params);
    let defaults = state.system_domain.default_options().await;

    let image = state.capture_domain.latest(&defaults, &overrides).await?;

    let last_modified = image.captured_at.format(HTTP_DATE).to_string();
    Ok((
        [
            (header::CONTENT_TYPE, CONTENT_TYPE_PNG.to_string()),
            (header::CACHE_CONTROL, NO_CACHE.to_string()),
            (header::PRAGMA, "no-cache".to_string()),
            (header::EXPIRES, "0".to_string()),
            (header::LAST_MODIFIED, last_modified),
        ],
        image.bytes,
    )
        .into_response())
}

/// 获取预览截图
pub async fn get_preview(State(state): State<AppState>) -> Result<Response, AppError> {
    let CachedImage { bytes, .. } = state.capture_domain.preview().await?;

    Ok((
        [
            (header::CONTENT_TYPE, CONTENT_TYPE_PNG),
            (header::CACHE_CONTROL, NO_CACHE),
        ],
        bytes,
    )
        .into_response())
}

/// 获取屏幕信息
pub async fn get_screen_info(
    State(state): State<AppState>,
) -> Result<Json<VirtualScreenBounds>, AppError> {
    Ok(Json(state.capture_domain.screen_info().await?))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::capture::backend::fake::FakeDisplay;
    use crate::models::{CaptureMode, ScreenRegion};
    use axum::http::StatusCode;

    fn decode(bytes: &[u8]) -> image::RgbaImage {
        image::load_from_memory(bytes).unwrap().to_rgba8()
    }

    #[tokio::test]
    async fn test_last_on_demand_returns_png_with_cache_headers() {
        let app = TestApp::new(CaptureMode::OnDemand).await;

        let response = app.get("/last").await;
        assert_status(&response, StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(headers[header::CACHE_CONTROL], NO_CACHE);
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers[header::EXPIRES], "0");
        let last_modified = headers[header::LAST_MODIFIED].to_str().unwrap().to_string();
        assert!(last_modified.ends_with(" GMT"), "{}", last_modified);
        assert!(chrono::DateTime::parse_from_rfc2822(&last_modified.replace("GMT", "+0000")).is_ok());

        let img = decode(&body_bytes(response).await);
        assert_eq!(img.dimensions(), (1920, 1080));
        assert_eq!(app.display.capture_count(), 1);
    }

    #[tokio::test]
    async fn test_last_realtime_before_first_capture_is_404() {
        let app = TestApp::new(CaptureMode::Realtime).await;

        let response = app.get("/last").await;
        assert_status(&response, StatusCode::NOT_FOUND);
        assert_eq!(app.display.capture_count(), 0);
    }

    #[tokio::test]
    async fn test_last_realtime_with_region_override() {
        let app = TestApp::new(CaptureMode::Realtime).await;
        app.state
            .capture_domain
            .get_orchestrator()
            .run_cycle(app.state.system_domain.default_options().await)
            .await
            .unwrap();

        let response = app.get("/last?x=0&y=0&width=200&height=200").await;
        assert_status(&response, StatusCode::OK);
        assert_eq!(decode(&body_bytes(response).await).dimensions(), (200, 200));
        assert_eq!(app.display.capture_count(), 2);

        // 之后的普通读取返回同一张 200x200 截图
        let response = app.get("/last").await;
        assert_eq!(decode(&body_bytes(response).await).dimensions(), (200, 200));
        assert_eq!(app.display.capture_count(), 2);
    }

    #[tokio::test]
    async fn test_last_applies_resize_override() {
        let app = TestApp::new(CaptureMode::OnDemand).await;

        let response = app.get("/last?max_width=640&max_height=480").await;
        assert_status(&response, StatusCode::OK);
        assert_eq!(decode(&body_bytes(response).await).dimensions(), (640, 360));
    }

    #[tokio::test]
    async fn test_last_ignores_unparsable_parameters() {
        let app = TestApp::new(CaptureMode::OnDemand).await;

        let response = app.get("/last?width=abc&compress=maybe&max_width=-3").await;
        assert_status(&response, StatusCode::OK);
        assert_eq!(decode(&body_bytes(response).await).dimensions(), (1920, 1080));
    }

    #[tokio::test]
    async fn test_last_region_outside_screen_is_500() {
        let app = TestApp::new(CaptureMode::OnDemand).await;

        let response = app.get("/last?x=5000&y=5000&width=10&height=10").await;
        assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.display.capture_count(), 0);
    }

    #[tokio::test]
    async fn test_last_capture_failure_is_500() {
        let app = TestApp::new(CaptureMode::OnDemand).await;
        app.display.set_failing(true);

        let response = app.get("/last").await;
        assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "CAPTURE_FAILED");
    }

    #[tokio::test]
    async fn test_last_uses_configured_default_region() {
        let app = TestApp::new(CaptureMode::OnDemand).await;
        let settings = app.state.system_domain.get_settings();
        let mut config = settings.get().await;
        config.capture.region = Some(ScreenRegion::new(100, 100, 800, 600));
        settings.update(config, false).await.unwrap();

        let response = app.get("/last").await;
        assert_eq!(decode(&body_bytes(response).await).dimensions(), (800, 600));
    }

    #[tokio::test]
    async fn test_preview_is_small_and_not_cached() {
        let app = TestApp::new(CaptureMode::Realtime).await;

        let response = app.get("/preview").await;
        assert_status(&response, StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], NO_CACHE);
        assert_eq!(decode(&body_bytes(response).await).dimensions(), (800, 450));

        // 预览不写入缓存
        let response = app.get("/last").await;
        assert_status(&response, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_screen_info_reports_virtual_bounds() {
        let bounds = VirtualScreenBounds::new(-1920, 0, 3840, 1080);
        let app =
            TestApp::with_display(CaptureMode::OnDemand, FakeDisplay::with_bounds(Some(bounds)))
                .await;

        let response = app.get("/screen-info").await;
        assert_status(&response, StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({ "x": -1920, "y": 0, "width": 3840, "height": 1080 })
        );
    }
}
