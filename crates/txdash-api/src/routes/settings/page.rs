//! Settings page rendering - Full page endpoints

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use txdash_utils::escape_html;

use crate::AppState;

pub async fn page_settings(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let config = &state.config;
    let theme = state.current_theme().await;

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Data</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Transactions file</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>State file</p><p class='font-medium'>{}</p></div>
                <div class='col-span-2'><p class='text-sm text-gray-500'>Sender address</p><p class='font-mono text-sm'>{}</p></div>
            </div>
        </div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Display</h3>
            <div class='grid grid-cols-2 gap-4'>
                <div><p class='text-sm text-gray-500'>Rows per page</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Search delay</p><p class='font-medium'>{} ms</p></div>
                <div><p class='text-sm text-gray-500'>Theme</p><p class='font-medium'>{} (default {})</p></div>
                <div><p class='text-sm text-gray-500'>Log level</p><p class='font-medium'>{}</p></div>
            </div>
        </div>"#,
        escape_html(&config.server.host),
        config.server.port,
        escape_html(&config.data.transactions_file.display().to_string()),
        escape_html(&config.data.state_file.display().to_string()),
        escape_html(&config.data.sender_address),
        config.pagination.page_size,
        config.search.debounce_ms,
        theme,
        config.theme.default,
        escape_html(&config.logging.level),
    );

    Html(crate::page_response(&headers, "Settings", "/settings", theme, &inner_content))
}
