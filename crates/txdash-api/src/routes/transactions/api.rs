//! Transactions API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_transactions: One page of filtered, sorted transactions (JSON)
//! - api_transaction_detail: Single transaction (JSON)
//! - api_transaction_create: Create a transaction (JSON)
//! - api_transactions_export: CSV download of every matching transaction
//! - htmx_transactions_list: Table fragment
//! - htmx_transaction_detail: Detail modal fragment
//! - htmx_transaction_create_form: Creation modal fragment
//! - htmx_transaction_store: Creation form submit (HTMX)

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use std::collections::HashMap;
use txdash_core::{
    export_filename, CreateTransactionRequest, QueryParams, QueryView, Transaction,
};
use txdash_store::StoreError;
use txdash_utils::escape_html;

use super::page::{
    render_create_form, render_create_success, render_form_error, render_transaction_detail,
    render_transaction_list,
};
use crate::error::ApiResult;
use crate::routes::{draft_from_form, parse_form};
use crate::AppState;

/// Event fired after a successful create so the list refreshes itself
const TRANSACTIONS_CHANGED: &str = "transactions-changed";

fn list_params(state: &AppState, query: &HashMap<String, String>) -> QueryParams {
    QueryParams::from_map(query, state.config.pagination.page_size)
}

/// Get one page of transactions (JSON API)
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<QueryView> {
    let params = list_params(&state, &query);
    let dashboard = state.dashboard.read().await;
    Json(dashboard.query(&params))
}

/// Get single transaction detail (JSON API)
pub async fn api_transaction_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    let dashboard = state.dashboard.read().await;
    let tx = dashboard.transaction(&id)?;
    Ok(Json(tx.clone()))
}

/// Create a transaction (JSON API)
pub async fn api_transaction_create(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let mut dashboard = state.dashboard.write().await;
    let created = dashboard.create(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Download every transaction matching the filters as CSV
pub async fn api_transactions_export(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let params = list_params(&state, &query);
    let csv = state.dashboard.read().await.export_csv(&params)?;
    let filename = export_filename(Utc::now().date_naive());
    log::info!("Exporting transactions as {}", filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        csv,
    )
        .into_response())
}

/// HTMX: Transactions list - Partial page update
pub async fn htmx_transactions_list(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Html<String> {
    let params = list_params(&state, &query);
    let dashboard = state.dashboard.read().await;
    let view = dashboard.query(&params);
    Html(render_transaction_list(&view, &params, dashboard.raw_count(), Utc::now()))
}

/// HTMX: Transaction detail modal
pub async fn htmx_transaction_detail(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let dashboard = state.dashboard.read().await;
    match dashboard.transaction(&id) {
        Ok(tx) => Html(render_transaction_detail(tx, Utc::now())),
        Err(e) => Html(format!(
            r#"<div id='tx-detail-modal' class='fixed inset-0 bg-black/40 flex items-center justify-center z-50' onclick='this.remove()'><div class='bg-white dark:bg-gray-800 rounded-xl p-6 text-red-500'>{}</div></div>"#,
            escape_html(&e.to_string())
        )),
    }
}

/// HTMX: Creation modal, pre-filled from the saved draft
pub async fn htmx_transaction_create_form(State(state): State<AppState>) -> Html<String> {
    let draft = match state.drafts.load().await {
        Ok(draft) => draft.unwrap_or_default(),
        Err(e) => {
            log::warn!("Failed to load transaction draft: {}", e);
            Default::default()
        }
    };
    Html(render_create_form(&draft, state.config.search.debounce_ms))
}

/// HTMX: Submit the creation form.
///
/// Success clears the draft and fires `transactions-changed`; failures keep
/// the draft and render a form-level message.
pub async fn htmx_transaction_store(State(state): State<AppState>, body: String) -> Response {
    let draft = draft_from_form(&parse_form(&body));
    let request = draft.to_request();

    let result = {
        let mut dashboard = state.dashboard.write().await;
        dashboard.create(&request).await
    };

    match result {
        Ok(tx) => {
            if let Err(e) = state.drafts.clear().await {
                log::warn!("Failed to clear transaction draft: {}", e);
            }
            (
                [("HX-Trigger", TRANSACTIONS_CHANGED)],
                Html(render_create_success(&tx)),
            )
                .into_response()
        }
        Err(StoreError::Core(e)) => {
            let details = e.to_details();
            Html(render_form_error(&details.message, details.field.as_deref())).into_response()
        }
        Err(e) => {
            let message = format!("Could not submit the transaction ({}). Your draft is kept, please retry.", e);
            Html(render_form_error(&message, None)).into_response()
        }
    }
}
