//! Transactions page rendering
//!
//! Endpoints:
//! - page_transactions: Dashboard page with stat cards, filters and the list
//!
//! Helper functions:
//! - render_transaction_list: Table fragment with sort headers and pagination
//! - render_transaction_detail: Detail modal
//! - render_create_form: Creation modal pre-filled from the draft

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use txdash_core::{
    EmptyState, QueryParams, QueryView, SortField, SortOrder, StatusFilter, Transaction,
    TransactionDraft, TransactionStatus,
};
use txdash_utils::{escape_html, format_amount, format_number, format_relative_time, truncate_address};

use crate::AppState;

const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 15, 25, 50, 100];

/// Encode parameters for a `/transactions/list` or export URL
pub fn query_string(params: &QueryParams) -> String {
    let mut pairs = vec![
        format!("status={}", params.status_filter),
        format!("sort={}", params.sort_field),
        format!("order={}", params.sort_order),
        format!("page={}", params.page),
        format!("page_size={}", params.page_size),
    ];
    if let Some(from) = params.date_from {
        pairs.push(format!("from={}", from));
    }
    if let Some(to) = params.date_to {
        pairs.push(format!("to={}", to));
    }
    if !params.search_query.is_empty() {
        pairs.push(format!("q={}", urlencoding::encode(&params.search_query)));
    }
    pairs.join("&")
}

/// Transactions page - stat cards, filter bar and the first page of results
pub async fn page_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Html<String> {
    let theme = state.current_theme().await;
    let params = QueryParams::from_map(&query, state.config.pagination.page_size);
    let dashboard = state.dashboard.read().await;
    let counts = dashboard.status_counts();
    let view = dashboard.query(&params);

    let banner = match dashboard.last_error() {
        Some(error) => format!(
            r#"<div class='mb-4 p-4 bg-red-50 border border-red-200 rounded-lg flex items-center justify-between dark:bg-red-900/30 dark:border-red-800'>
                <div><p class='font-medium text-red-800 dark:text-red-200'>Could not load transactions</p><p class='text-sm text-red-600 dark:text-red-300'>{}</p></div>
                <button hx-post='/api/reload' hx-swap='none' hx-on::after-request='window.location.reload()' class='px-3 py-1.5 text-sm bg-red-600 text-white rounded-lg hover:bg-red-700'>Retry</button>
            </div>"#,
            escape_html(error)
        ),
        None => String::new(),
    };

    let inner_content = format!(
        r#"{}
        <div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Transactions</h2>
            <div class='flex gap-2'>
                <button hx-post='/api/reload' hx-swap='none' hx-on::after-request='window.location.reload()'
                    class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200 dark:bg-gray-700 dark:text-gray-200' title='Reload transactions'>Reload</button>
                <button hx-get='/transactions/create' hx-swap='beforeend' hx-target='body'
                    class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>New transaction</button>
            </div>
        </div>
        <div class='grid grid-cols-2 md:grid-cols-4 gap-3 mb-4'>
            <div class='bg-indigo-50 p-3 rounded-lg border border-indigo-100 dark:bg-gray-800 dark:border-gray-700'><p class='text-xs text-indigo-600'>Total</p><p class='text-xl font-bold'>{}</p></div>
            <div class='bg-yellow-50 p-3 rounded-lg border border-yellow-100 dark:bg-gray-800 dark:border-gray-700'><p class='text-xs text-yellow-600'>Pending</p><p class='text-xl font-bold'>{}</p></div>
            <div class='bg-green-50 p-3 rounded-lg border border-green-100 dark:bg-gray-800 dark:border-gray-700'><p class='text-xs text-green-600'>Confirmed</p><p class='text-xl font-bold'>{}</p></div>
            <div class='bg-red-50 p-3 rounded-lg border border-red-100 dark:bg-gray-800 dark:border-gray-700'><p class='text-xs text-red-600'>Failed</p><p class='text-xl font-bold'>{}</p></div>
        </div>
        {}
        {}
        <div id='transactions-content' hx-get='/transactions/list' hx-include='#tx-filters' hx-trigger='transactions-changed from:body'>{}</div>"#,
        banner,
        format_number(counts.total),
        format_number(counts.pending),
        format_number(counts.confirmed),
        format_number(counts.failed),
        render_filters(&params, state.config.search.debounce_ms),
        render_sort_state(&params, false),
        render_transaction_list(&view, &params, dashboard.raw_count(), Utc::now()),
    );

    Html(crate::page_response(&headers, "Transactions", "/transactions", theme, &inner_content))
}

/// Filter bar; any change reloads the list from page 1
fn render_filters(params: &QueryParams, debounce_ms: u64) -> String {
    let status_options: String = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Confirmed,
        StatusFilter::Failed,
    ]
    .iter()
    .map(|filter| {
        let label = match filter {
            StatusFilter::All => "All statuses",
            StatusFilter::Pending => "Pending",
            StatusFilter::Confirmed => "Confirmed",
            StatusFilter::Failed => "Failed",
        };
        format!(
            "<option value='{}' {}>{}</option>",
            filter,
            if *filter == params.status_filter { "selected" } else { "" },
            label
        )
    })
    .collect();

    let mut sizes: Vec<usize> = PAGE_SIZE_OPTIONS.to_vec();
    if !sizes.contains(&params.page_size) {
        sizes.push(params.page_size);
        sizes.sort_unstable();
    }
    let size_options: String = sizes
        .iter()
        .map(|size| {
            format!(
                "<option value='{}' {}>{} / page</option>",
                size,
                if *size == params.page_size { "selected" } else { "" },
                size
            )
        })
        .collect();

    let date_value = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

    format!(
        r#"<form id='tx-filters' hx-get='/transactions/list' hx-target='#transactions-content'
            hx-trigger='change, input delay:{}ms' onsubmit='return false'
            class='flex flex-wrap items-center gap-2 mb-4 p-3 bg-white dark:bg-gray-800 rounded-lg border dark:border-gray-700 shadow-sm'>
            <input type='search' name='q' value='{}' placeholder='Search hash or address...'
                class='px-3 py-2 border rounded-lg w-64 dark:bg-gray-900 dark:border-gray-600'>
            <select name='status' class='px-3 py-2 border rounded-lg dark:bg-gray-900 dark:border-gray-600'>{}</select>
            <label class='text-sm text-gray-500'>From</label>
            <input type='date' name='from' value='{}' class='px-2 py-1.5 border rounded-lg dark:bg-gray-900 dark:border-gray-600'>
            <label class='text-sm text-gray-500'>To</label>
            <input type='date' name='to' value='{}' class='px-2 py-1.5 border rounded-lg dark:bg-gray-900 dark:border-gray-600'>
            <div class='flex-1'></div>
            <select name='page_size' class='px-3 py-2 border rounded-lg dark:bg-gray-900 dark:border-gray-600'>{}</select>
        </form>"#,
        debounce_ms,
        escape_html(&params.search_query),
        status_options,
        date_value(params.date_from),
        date_value(params.date_to),
        size_options,
    )
}

/// Hidden sort inputs bound to the filter form so filter changes keep the sort
fn render_sort_state(params: &QueryParams, out_of_band: bool) -> String {
    format!(
        r#"<div id='sort-state' {}><input type='hidden' form='tx-filters' name='sort' value='{}'><input type='hidden' form='tx-filters' name='order' value='{}'></div>"#,
        if out_of_band { "hx-swap-oob='true'" } else { "" },
        params.sort_field,
        params.sort_order
    )
}

fn status_badge(status: TransactionStatus) -> String {
    let class = match status {
        TransactionStatus::Pending => "bg-yellow-100 text-yellow-800",
        TransactionStatus::Confirmed => "bg-green-100 text-green-800",
        TransactionStatus::Failed => "bg-red-100 text-red-800",
    };
    format!(
        "<span class='px-2 py-0.5 rounded-full text-xs font-medium {}'>{}</span>",
        class, status
    )
}

fn sort_header(label: &str, field: SortField, params: &QueryParams) -> String {
    let next = params.clone().select_sort(field);
    let indicator = if params.sort_field == field {
        match params.sort_order {
            SortOrder::Asc => " ↑",
            SortOrder::Desc => " ↓",
        }
    } else {
        ""
    };
    format!(
        r#"<th class='px-3 py-2 text-left'><button hx-get='/transactions/list?{}' hx-target='#transactions-content' class='font-semibold hover:text-indigo-600'>{}{}</button></th>"#,
        query_string(&next),
        label,
        indicator
    )
}

/// Table fragment for one page of results
pub fn render_transaction_list(view: &QueryView, params: &QueryParams, raw_count: usize, now: DateTime<Utc>) -> String {
    let mut html = render_sort_state(params, true);

    match view.empty_state(raw_count) {
        Some(EmptyState::NoData) => {
            html.push_str(
                r#"<div class='text-center py-12 text-gray-500'><p class='font-medium'>No transactions yet</p><p class='text-sm'>Create one with the New transaction button.</p></div>"#,
            );
            return html;
        }
        Some(EmptyState::NoMatches) => {
            let cleared = QueryParams::with_default_page_size(params.page_size).with_sort(params.sort_state());
            html.push_str(&format!(
                r#"<div class='text-center py-12 text-gray-500'><p class='font-medium'>No transactions match the current filters</p>
                <button hx-get='/transactions/list?{}' hx-target='#transactions-content' onclick='document.getElementById("tx-filters").reset()' class='mt-2 text-sm text-indigo-600 hover:underline'>Clear filters</button></div>"#,
                query_string(&cleared)
            ));
            return html;
        }
        None => {}
    }

    html.push_str(&format!(
        r#"<div class='bg-white dark:bg-gray-800 rounded-lg border dark:border-gray-700 overflow-x-auto'>
        <table class='min-w-full text-sm'>
            <thead class='bg-gray-50 dark:bg-gray-900 text-gray-600 dark:text-gray-300'><tr>
                <th class='px-3 py-2 text-left'>Hash</th>
                <th class='px-3 py-2 text-left'>From</th>
                <th class='px-3 py-2 text-left'>To</th>
                {}{}{}
            </tr></thead>
            <tbody>"#,
        sort_header("Amount", SortField::Amount, params),
        sort_header("Status", SortField::Status, params),
        sort_header("Date", SortField::Date, params),
    ));

    for tx in &view.transactions {
        html.push_str(&format!(
            r#"<tr class='border-t dark:border-gray-700 hover:bg-gray-50 dark:hover:bg-gray-700 cursor-pointer'
                hx-get='/transactions/{}/detail' hx-target='body' hx-swap='beforeend'>
                <td class='px-3 py-2 font-mono' title='{}'>{}</td>
                <td class='px-3 py-2 font-mono' title='{}'>{}</td>
                <td class='px-3 py-2 font-mono' title='{}'>{}</td>
                <td class='px-3 py-2 text-right font-medium'>{}</td>
                <td class='px-3 py-2'>{}</td>
                <td class='px-3 py-2 text-gray-500' title='{}'>{}</td>
            </tr>"#,
            urlencoding::encode(&tx.id),
            escape_html(&tx.hash),
            escape_html(&truncate_address(&tx.hash)),
            escape_html(&tx.from_address),
            escape_html(&truncate_address(&tx.from_address)),
            escape_html(&tx.to_address),
            escape_html(&truncate_address(&tx.to_address)),
            format_amount(&tx.amount),
            status_badge(tx.status),
            escape_html(&tx.timestamp),
            format_relative_time(&tx.timestamp, now),
        ));
    }
    html.push_str("</tbody></table></div>");

    let page_button = |label: &str, page: usize, enabled: bool| {
        format!(
            r#"<button {} hx-get='/transactions/list?{}' hx-target='#transactions-content' class='px-3 py-1 border rounded hover:bg-gray-100 dark:hover:bg-gray-700 {}'>{}</button>"#,
            if enabled { "" } else { "disabled" },
            query_string(&params.clone().with_page(page)),
            if enabled { "" } else { "opacity-50 cursor-not-allowed" },
            label
        )
    };

    html.push_str(&format!(
        r#"<div class='mt-4 flex items-center justify-between flex-wrap gap-4'>
            <span class='text-sm text-gray-500'>Showing {}-{} of {}</span>
            <div class='flex items-center gap-2'>
                {}{}
                <span class='text-sm text-gray-600 dark:text-gray-300'>Page {} of {}</span>
                {}{}
                <a href='/api/transactions/export?{}' download class='ml-4 px-3 py-1 border rounded text-indigo-600 hover:bg-indigo-50 dark:hover:bg-gray-700'>Export CSV</a>
            </div>
        </div>"#,
        format_number(view.range_start),
        format_number(view.range_end),
        format_number(view.total_count),
        page_button("First", 1, view.has_previous()),
        page_button("Previous", view.page.saturating_sub(1), view.has_previous()),
        view.page,
        view.total_pages,
        page_button("Next", view.page + 1, view.has_next()),
        page_button("Last", view.total_pages, view.has_next()),
        query_string(params),
    ));

    html
}

/// Detail modal for a single transaction
pub fn render_transaction_detail(tx: &Transaction, now: DateTime<Utc>) -> String {
    let row = |label: &str, value: &str, mono: bool| {
        format!(
            r#"<div class='py-2 border-b dark:border-gray-700'><p class='text-xs text-gray-500'>{}</p><p class='{} break-all'>{}</p></div>"#,
            label,
            if mono { "font-mono text-sm" } else { "font-medium" },
            value
        )
    };

    let gas_limit = tx.gas_limit.as_deref().map(escape_html).unwrap_or_else(|| "-".to_string());
    let gas_price = tx.gas_price.as_deref().map(escape_html).unwrap_or_else(|| "-".to_string());
    let timestamp = format!(
        "{} <span class='text-gray-400'>({})</span>",
        escape_html(&tx.timestamp),
        format_relative_time(&tx.timestamp, now)
    );

    format!(
        r##"<div id='tx-detail-modal' class='fixed inset-0 bg-black/40 flex items-center justify-center z-50' onclick='if (event.target === this) this.remove()'>
            <div class='bg-white dark:bg-gray-800 rounded-xl shadow-lg p-6 w-full max-w-xl'>
                <div class='flex items-center justify-between mb-4'>
                    <h3 class='text-lg font-semibold'>Transaction details</h3>
                    <button onclick='this.closest("#tx-detail-modal").remove()' class='text-gray-400 hover:text-gray-600'>✕</button>
                </div>
                {}{}{}{}{}
                <div class='py-2 border-b dark:border-gray-700'><p class='text-xs text-gray-500'>Status</p>{}</div>
                {}{}{}
            </div>
        </div>"##,
        row("ID", &escape_html(&tx.id), true),
        row("Hash", &escape_html(&tx.hash), true),
        row("From", &escape_html(&tx.from_address), true),
        row("To", &escape_html(&tx.to_address), true),
        row("Amount", &format_amount(&tx.amount), false),
        status_badge(tx.status),
        row("Gas limit", &gas_limit, false),
        row("Gas price", &gas_price, false),
        row("Timestamp", &timestamp, false),
    )
}

/// Creation modal; inputs autosave to the draft as the user types
pub fn render_create_form(draft: &TransactionDraft, debounce_ms: u64) -> String {
    let input = |name: &str, label: &str, value: &str, placeholder: &str| {
        format!(
            r#"<div>
                <label class='block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1'>{}</label>
                <input type='text' name='{}' value='{}' placeholder='{}' class='w-full px-3 py-2.5 border rounded-lg focus:ring-2 focus:ring-indigo-500 dark:bg-gray-900 dark:border-gray-600'>
            </div>"#,
            label,
            name,
            escape_html(value),
            placeholder
        )
    };

    format!(
        r##"<div id='tx-create-modal' class='fixed inset-0 bg-black/40 flex items-center justify-center z-50'>
            <div class='bg-white dark:bg-gray-800 rounded-xl shadow-lg p-6 w-full max-w-lg'>
                <div class='flex items-center justify-between mb-4'>
                    <h3 class='text-lg font-semibold'>New transaction</h3>
                    <button onclick='this.closest("#tx-create-modal").remove()' class='text-gray-400 hover:text-gray-600'>✕</button>
                </div>
                <form hx-post='/transactions' hx-target='#create-result' hx-swap='innerHTML'>
                    <div class='space-y-4' hx-put='/api/draft' hx-trigger='input delay:{}ms from:closest form' hx-include='closest form' hx-swap='none'>
                        {}
                        {}
                        <div class='grid grid-cols-2 gap-4'>{}{}</div>
                    </div>
                    <div class='flex items-center gap-4 mt-6'>
                        <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Submit</button>
                        <button type='button' hx-delete='/api/draft' hx-swap='none'
                            onclick='this.form.querySelectorAll("input").forEach(function (i) {{ i.value = ""; }})'
                            class='px-4 py-2 border rounded-lg hover:bg-gray-50 dark:hover:bg-gray-700'>Clear</button>
                    </div>
                </form>
                <div id='create-result' class='mt-4'></div>
            </div>
        </div>"##,
        debounce_ms,
        input("toAddress", "Recipient address", &draft.to_address, "0x..."),
        input("amount", "Amount", &draft.amount, "0.0"),
        input("gasLimit", "Gas limit", &draft.gas_limit, txdash_core::DEFAULT_GAS_LIMIT),
        input("gasPrice", "Gas price", &draft.gas_price, txdash_core::DEFAULT_GAS_PRICE),
    )
}

/// Form-level failure message
pub fn render_form_error(message: &str, field: Option<&str>) -> String {
    let field = field
        .map(|f| format!("<p class='text-xs text-red-500 mt-1'>Field: {}</p>", escape_html(f)))
        .unwrap_or_default();
    format!(
        r#"<div class='bg-red-50 border border-red-200 rounded-lg p-4 dark:bg-red-900/30 dark:border-red-800'><span class='font-medium text-red-800 dark:text-red-200'>Not submitted</span><p class='text-sm text-red-600 dark:text-red-300 mt-1'>{}</p>{}</div>"#,
        escape_html(message),
        field
    )
}

pub fn render_create_success(tx: &Transaction) -> String {
    format!(
        r#"<div class='bg-green-50 border border-green-200 rounded-lg p-4 dark:bg-green-900/30 dark:border-green-800'><span class='font-medium text-green-800 dark:text-green-200'>Transaction submitted</span><p class='text-sm text-green-700 dark:text-green-300 mt-1 font-mono break-all'>{}</p></div>"#,
        escape_html(&tx.hash)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn tx(id: &str, amount: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            hash: "0x1234567890abcdef".to_string(),
            from_address: "0xfrom0000000000000001".to_string(),
            to_address: "0xto000000000000000002".to_string(),
            amount: amount.to_string(),
            status: TransactionStatus::Pending,
            gas_limit: None,
            gas_price: Some("0.1".to_string()),
            timestamp: "2024-06-15T11:55:00Z".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_query_string_encodes_search() {
        let params = QueryParams::default()
            .with_search("0x ab&c")
            .with_date_range(NaiveDate::from_ymd_opt(2024, 1, 2), None);
        let qs = query_string(&params);
        assert!(qs.contains("q=0x%20ab%26c"));
        assert!(qs.contains("from=2024-01-02"));
        assert!(qs.contains("sort=date&order=desc&page=1&page_size=15"));
        assert!(!qs.contains("to="));
    }

    #[test]
    fn test_query_string_round_trips_through_from_map() {
        let params = QueryParams::default()
            .with_status_filter(StatusFilter::Failed)
            .with_search("needle")
            .with_page(3);
        let map: HashMap<String, String> = query_string(&params)
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), urlencoding::decode(v).unwrap().into_owned()))
            .collect();
        assert_eq!(QueryParams::from_map(&map, 15), params);
    }

    #[test]
    fn test_list_renders_rows_and_sort_links() {
        let txs = vec![tx("a", "1.5"), tx("b", "2")];
        let params = QueryParams::default();
        let view = txdash_core::query(&txs, &params);
        let html = render_transaction_list(&view, &params, txs.len(), now());

        assert!(html.contains("0x1234...cdef"));
        assert!(html.contains("1.50"));
        assert!(html.contains("5m ago"));
        assert!(html.contains("Showing 1-2 of 2"));
        assert!(html.contains("Date ↓"));
        // clicking Amount starts descending, clicking the active Date flips it
        assert!(html.contains("sort=amount&order=desc&page=1"));
        assert!(html.contains("sort=date&order=asc&page=1"));
        assert!(html.contains("hx-swap-oob='true'"));
    }

    #[test]
    fn test_list_empty_states() {
        let params = QueryParams::default().with_search("zzz");
        let view = txdash_core::query(&[], &params);
        assert!(render_transaction_list(&view, &params, 0, now()).contains("No transactions yet"));
        assert!(render_transaction_list(&view, &params, 5, now()).contains("No transactions match the current filters"));
    }

    #[test]
    fn test_detail_escapes_and_fills_gaps() {
        let mut t = tx("a", "1");
        t.hash = "<b>".to_string();
        let html = render_transaction_detail(&t, now());
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("Gas limit</p><p class='font-medium break-all'>-"));
        assert!(html.contains("this.closest(\"#tx-detail-modal\").remove()"));
        assert!(html.trim_end().ends_with("</div>"));
    }

    #[test]
    fn test_create_form_prefills_draft() {
        let draft = TransactionDraft {
            to_address: "0xabc".to_string(),
            amount: "'5'".to_string(),
            ..Default::default()
        };
        let html = render_create_form(&draft, 300);
        assert!(html.contains("value='0xabc'"));
        assert!(html.contains("value='&#39;5&#39;'"));
        assert!(html.contains("input delay:300ms"));
        assert!(html.contains("this.closest(\"#tx-create-modal\").remove()"));
    }
}
