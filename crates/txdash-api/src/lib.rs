//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::transactions: List, filters, sort, pagination, detail, create, export
//! - routes::drafts: Creation form draft persistence
//! - routes::settings: Configuration display and theme preference

pub mod error;
pub mod routes;

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use txdash_config::{Config, Theme};
use txdash_store::{Dashboard, DraftStore, KeyValueStoreRef, ThemeStore};

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<RwLock<Dashboard>>,
    pub config: Config,
    pub drafts: DraftStore,
    pub theme: ThemeStore,
}

impl AppState {
    /// Build state around a dashboard; draft and theme share one key-value store
    pub fn new(config: Config, dashboard: Dashboard, kv: KeyValueStoreRef) -> Self {
        let theme = ThemeStore::new(kv.clone(), config.theme.default);
        Self {
            dashboard: Arc::new(RwLock::new(dashboard)),
            drafts: DraftStore::new(kv),
            theme,
            config,
        }
    }

    /// Theme for rendering; storage failures fall back to the configured default
    pub async fn current_theme(&self) -> Theme {
        match self.theme.load().await {
            Ok(theme) => theme,
            Err(e) => {
                log::warn!("Failed to read theme preference: {}", e);
                self.config.theme.default
            }
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::drafts::{api_draft, api_draft_clear, api_draft_save};
    use routes::settings::{api_settings, api_theme, api_theme_toggle, page_settings};
    use routes::transactions::{
        api_transaction_create, api_transaction_detail, api_transactions, api_transactions_export,
        htmx_transaction_create_form, htmx_transaction_detail, htmx_transaction_store,
        htmx_transactions_list, page_transactions,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/transactions", get(api_transactions).post(api_transaction_create))
        .route("/api/transactions/export", get(api_transactions_export))
        .route("/api/transactions/:id", get(api_transaction_detail))
        .route("/api/draft", get(api_draft).put(api_draft_save).delete(api_draft_clear))
        .route("/api/theme", get(api_theme))
        .route("/api/theme/toggle", post(api_theme_toggle))
        .route("/api/reload", post(api_reload))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_transactions))
        .route("/transactions", get(page_transactions).post(htmx_transaction_store))
        .route("/settings", get(page_settings))
        // HTMX partial routes
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/create", get(htmx_transaction_create_form))
        .route("/transactions/:id/detail", get(htmx_transaction_detail))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Re-fetch the transaction snapshot
async fn api_reload(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let mut dashboard = state.dashboard.write().await;
    let count = dashboard.reload().await?;
    Ok(Json(serde_json::json!({ "success": true, "count": count })))
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, theme: Theme, content: &str) -> String {
    let html_class = match theme {
        Theme::Dark => "dark",
        Theme::Light => "",
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - txdash</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>tailwind.config = {{ darkMode: 'class' }}</script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900 dark:bg-gray-900 dark:text-gray-100">
    {}
</body>
</html>"#,
        html_class,
        txdash_utils::escape_html(title),
        content
    )
}

/// Navigation sidebar with the theme switch
pub fn nav_sidebar(current_path: &str, theme: Theme) -> String {
    let links = [("/transactions", "Transactions"), ("/settings", "Settings")];

    let mut nav = String::from(
        "<div class='bg-white dark:bg-gray-800 border-r dark:border-gray-700 h-screen flex flex-col'><div class='p-4 border-b dark:border-gray-700'><h1 class='text-xl font-bold text-indigo-600'>txdash</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>",
    );

    for (path, label) in &links {
        let is_active = if *path == "/transactions" {
            current_path == "/" || current_path.starts_with(path)
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active {
            "bg-indigo-50 text-indigo-600 dark:bg-gray-700"
        } else {
            "text-gray-600 dark:text-gray-300 hover:bg-gray-50 dark:hover:bg-gray-700"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul>");

    let toggle_label = match theme {
        Theme::Light => "Dark mode",
        Theme::Dark => "Light mode",
    };
    nav.push_str(&format!(
        r#"<div class='p-4 border-t dark:border-gray-700'><button hx-post='/api/theme/toggle' hx-swap='none' class='w-full px-3 py-2 text-sm border rounded-lg hover:bg-gray-50 dark:hover:bg-gray-700'>{}</button></div></div>"#,
        toggle_label
    ));
    nav
}

/// Whether the request came from htmx
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &HeaderMap, title: &str, current_path: &str, theme: Theme, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(
            r#"<main class='flex-1 overflow-auto p-6'>{}</main>"#,
            inner_content
        )
    } else {
        base_html(
            title,
            theme,
            &format!(
                r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto p-6'>{}</main>
    </div>
</div>"#,
                nav_sidebar(current_path, theme),
                inner_content
            ),
        )
    }
}

/// Start the HTTP server and run until Ctrl-C
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txdash server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /transactions (Dashboard)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
