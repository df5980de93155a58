//! Settings API endpoints - JSON API

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use txdash_config::Config;

use crate::error::ApiResult;
use crate::AppState;

/// Effective configuration
pub async fn api_settings(State(state): State<AppState>) -> Json<Config> {
    Json(state.config.clone())
}

pub async fn api_theme(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let theme = state.theme.load().await?;
    Ok(Json(serde_json::json!({ "theme": theme })))
}

/// Flip the theme; htmx callers get a full refresh so the page re-renders
pub async fn api_theme_toggle(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let theme = state.theme.toggle().await?;
    let body = Json(serde_json::json!({ "theme": theme }));
    if crate::is_htmx_request(&headers) {
        Ok(([("HX-Refresh", "true")], body).into_response())
    } else {
        Ok(body.into_response())
    }
}
