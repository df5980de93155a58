//! Draft API endpoints - JSON or form-encoded bodies

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use txdash_core::TransactionDraft;

use crate::error::{ApiError, ApiResult};
use crate::routes::{draft_from_form, parse_form};
use crate::AppState;

/// Saved draft, `null` when there is none
pub async fn api_draft(State(state): State<AppState>) -> ApiResult<Json<Option<TransactionDraft>>> {
    Ok(Json(state.drafts.load().await?))
}

/// Save the draft.
///
/// htmx posts the form url-encoded on every change; API clients send JSON.
pub async fn api_draft_save(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<StatusCode> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with("application/json"));

    let draft = if is_json {
        serde_json::from_str::<TransactionDraft>(&body).map_err(|e| ApiError::BadRequest {
            message: format!("Invalid draft: {}", e),
        })?
    } else {
        draft_from_form(&parse_form(&body))
    };

    state.drafts.save(&draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn api_draft_clear(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.drafts.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
