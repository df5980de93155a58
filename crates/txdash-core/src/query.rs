//! Transaction query pipeline
//!
//! Stages run in a fixed order over an immutable snapshot:
//! 1. status filter
//! 2. date-from / date-to bounds
//! 3. free-text search
//! 4. stable sort
//! 5. pagination
//!
//! Nothing here fails or allocates beyond the result; malformed fields
//! degrade to documented defaults (excluded from date ranges, zero amount).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::Transaction;
use crate::time::{DateBounds, TimeFilter};
use crate::types::{SortField, SortOrder, StatusFilter, TransactionStatus};

/// Rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Current sort selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Header click: a new field starts descending, the active field flips
    pub fn select(self, field: SortField) -> Self {
        if field == self.field {
            Self::new(field, self.order.flip())
        } else {
            Self::new(field, SortOrder::Desc)
        }
    }
}

/// Query parameters reflecting the current UI state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub status_filter: StatusFilter,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search_query: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// 1-based; clamped by the pipeline
    pub page: usize,
    pub page_size: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            status_filter: StatusFilter::All,
            date_from: None,
            date_to: None,
            search_query: String::new(),
            sort_field: SortField::Date,
            sort_order: SortOrder::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryParams {
    /// Default parameters with a specific page size
    pub fn with_default_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Build parameters from request query pairs.
    ///
    /// Recognised keys: `status`, `from`, `to`, `q`, `sort`, `order`, `page`,
    /// `page_size`. Malformed values fall back to their defaults.
    pub fn from_map(map: &HashMap<String, String>, default_page_size: usize) -> Self {
        let defaults = Self::with_default_page_size(default_page_size);

        fn parsed<T: std::str::FromStr>(map: &HashMap<String, String>, key: &str) -> Option<T> {
            let raw = map.get(key)?.trim();
            if raw.is_empty() {
                return None;
            }
            let value = raw.parse().ok();
            if value.is_none() {
                log::debug!("Ignoring malformed query parameter {}={}", key, raw);
            }
            value
        }

        let date = |key: &str| -> Option<NaiveDate> {
            let raw = map.get(key)?.trim();
            if raw.is_empty() {
                return None;
            }
            let value = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
            if value.is_none() {
                log::debug!("Ignoring malformed date parameter {}={}", key, raw);
            }
            value
        };

        Self {
            status_filter: parsed(map, "status").unwrap_or(defaults.status_filter),
            date_from: date("from"),
            date_to: date("to"),
            search_query: map.get("q").cloned().unwrap_or_default(),
            sort_field: parsed(map, "sort").unwrap_or(defaults.sort_field),
            sort_order: parsed(map, "order").unwrap_or(defaults.sort_order),
            page: parsed::<usize>(map, "page").unwrap_or(1).max(1),
            page_size: parsed::<usize>(map, "page_size")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
        }
    }

    /// Current sort selection
    pub fn sort_state(&self) -> SortState {
        SortState::new(self.sort_field, self.sort_order)
    }

    /// Apply a sort selection; resets to the first page
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort_field = sort.field;
        self.sort_order = sort.order;
        self.page = 1;
        self
    }

    /// Header click on `field` (see [`SortState::select`]); resets to the first page
    pub fn select_sort(self, field: SortField) -> Self {
        let next = self.sort_state().select(field);
        self.with_sort(next)
    }

    /// Change the status filter; resets to the first page
    pub fn with_status_filter(mut self, status_filter: StatusFilter) -> Self {
        self.status_filter = status_filter;
        self.page = 1;
        self
    }

    /// Change the date range; resets to the first page
    pub fn with_date_range(mut self, date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Self {
        self.date_from = date_from;
        self.date_to = date_to;
        self.page = 1;
        self
    }

    /// Change the search text; resets to the first page
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self.page = 1;
        self
    }

    /// Change the page size; resets to the first page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.page = 1;
        self
    }

    /// Jump to a page (clamped later by [`query`])
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Any filter or search narrows the result
    pub fn has_filters(&self) -> bool {
        self.status_filter != StatusFilter::All
            || self.date_from.is_some()
            || self.date_to.is_some()
            || !self.search_query.trim().is_empty()
    }
}

/// Why a page came back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyState {
    /// The data source has no transactions at all
    NoData,
    /// Transactions exist but the filters exclude all of them
    NoMatches,
}

/// One page of the filtered, sorted transaction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryView {
    /// Rows on the current page
    pub transactions: Vec<Transaction>,
    pub total_count: usize,
    pub total_pages: usize,
    /// 1-based index of the first visible row, 0 when empty
    pub range_start: usize,
    /// 1-based index of the last visible row, 0 when empty
    pub range_end: usize,
    /// Effective page after clamping
    pub page: usize,
    pub page_size: usize,
}

impl QueryView {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Classify an empty page given the unfiltered transaction count
    pub fn empty_state(&self, raw_count: usize) -> Option<EmptyState> {
        if !self.transactions.is_empty() {
            None
        } else if raw_count == 0 {
            Some(EmptyState::NoData)
        } else {
            Some(EmptyState::NoMatches)
        }
    }
}

/// Per-status counts for the dashboard stat cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn tally(transactions: &[Transaction]) -> Self {
        transactions.iter().fold(Self::default(), |mut counts, tx| {
            counts.total += 1;
            match tx.status {
                TransactionStatus::Pending => counts.pending += 1,
                TransactionStatus::Confirmed => counts.confirmed += 1,
                TransactionStatus::Failed => counts.failed += 1,
            }
            counts
        })
    }
}

/// Precomputed sort key so each row is parsed once per query
#[derive(Debug, Clone, Copy)]
enum SortKey {
    /// `None` (unparseable) sorts before every valid timestamp
    Date(Option<DateTime<Utc>>),
    Amount(f64),
    Status(&'static str),
}

impl SortKey {
    fn of(tx: &Transaction, field: SortField) -> Self {
        match field {
            SortField::Date => SortKey::Date(tx.timestamp_utc()),
            SortField::Amount => SortKey::Amount(tx.amount_value()),
            SortField::Status => SortKey::Status(tx.status.as_str()),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Amount(a), SortKey::Amount(b)) => a.total_cmp(b),
            (SortKey::Status(a), SortKey::Status(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Run the filter, search and sort stages, returning every matching row
pub fn filter_and_sort<'a>(transactions: &'a [Transaction], params: &QueryParams) -> Vec<&'a Transaction> {
    let bounds = DateBounds::new(params.date_from, params.date_to);
    let needle = params.search_query.trim().to_lowercase();

    let mut keyed: Vec<(SortKey, &Transaction)> = transactions
        .iter()
        .filter(|tx| params.status_filter.matches(tx.status))
        .filter(|tx| tx.filter_by_time(&bounds))
        .filter(|tx| needle.is_empty() || tx.matches_search(&needle))
        .map(|tx| (SortKey::of(tx, params.sort_field), tx))
        .collect();

    // slice::sort_by is stable; reversing an Equal result keeps ties in input order
    keyed.sort_by(|(a, _), (b, _)| params.sort_order.apply(a.compare(b)));

    log::debug!(
        "Query matched {} of {} transactions (status={}, search={:?}, sort={} {})",
        keyed.len(),
        transactions.len(),
        params.status_filter,
        needle,
        params.sort_field,
        params.sort_order
    );

    keyed.into_iter().map(|(_, tx)| tx).collect()
}

/// Run the full pipeline and cut out the requested page
pub fn query(transactions: &[Transaction], params: &QueryParams) -> QueryView {
    let rows = filter_and_sort(transactions, params);

    let page_size = params.page_size.max(1);
    let total_count = rows.len();
    let total_pages = total_count.div_ceil(page_size);
    let page = params.page.clamp(1, total_pages.max(1));

    let start = ((page - 1) * page_size).min(total_count);
    let end = (start + page_size).min(total_count);
    let (range_start, range_end) = if total_count == 0 { (0, 0) } else { (start + 1, end) };

    QueryView {
        transactions: rows[start..end].iter().map(|tx| (*tx).clone()).collect(),
        total_count,
        total_pages,
        range_start,
        range_end,
        page,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tx(id: &str, timestamp: &str, amount: &str, status: TransactionStatus) -> Transaction {
        Transaction {
            id: id.to_string(),
            hash: format!("0xhash{}", id),
            from_address: "0xsender".to_string(),
            to_address: "0xreceiver".to_string(),
            amount: amount.to_string(),
            status,
            gas_limit: None,
            gas_price: None,
            timestamp: timestamp.to_string(),
        }
    }

    fn ids(rows: &[Transaction]) -> Vec<&str> {
        rows.iter().map(|t| t.id.as_str()).collect()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("a", "2024-01-10T08:00:00Z", "5", TransactionStatus::Confirmed),
            tx("b", "2024-01-12T08:00:00Z", "1.5", TransactionStatus::Pending),
            tx("c", "garbage", "2", TransactionStatus::Failed),
            tx("d", "2024-01-11T08:00:00Z", "not-a-number", TransactionStatus::Confirmed),
            tx("e", "2024-01-15T23:59:59.999Z", "0.5", TransactionStatus::Pending),
        ]
    }

    #[test]
    fn test_amount_asc_scenario() {
        let txs = vec![
            tx("first", "2024-01-01T00:00:00Z", "1.5", TransactionStatus::Confirmed),
            tx("second", "2024-01-01T01:00:00Z", "0.2", TransactionStatus::Pending),
        ];
        let params = QueryParams {
            sort_field: SortField::Amount,
            sort_order: SortOrder::Asc,
            ..QueryParams::default()
        };
        let view = query(&txs, &params);
        assert_eq!(ids(&view.transactions), vec!["second", "first"]);
        assert_eq!(view.total_count, 2);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.range_start, 1);
        assert_eq!(view.range_end, 2);
    }

    #[test]
    fn test_zero_amounts_share_one_sort_key() {
        let txs = vec![
            tx("zero", "2024-01-01T00:00:00Z", "0", TransactionStatus::Confirmed),
            tx("bad", "2024-01-01T00:00:00Z", "oops", TransactionStatus::Confirmed),
            tx("negzero", "2024-01-01T00:00:00Z", "-0", TransactionStatus::Confirmed),
        ];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let params = QueryParams::default().with_sort(SortState::new(SortField::Amount, order));
            assert_eq!(ids(&query(&txs, &params).transactions), vec!["zero", "bad", "negzero"]);
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut hit = tx("hit", "2024-01-01T00:00:00Z", "1", TransactionStatus::Confirmed);
        hit.hash = "0xABCdef0123".to_string();
        let mut miss = tx("miss", "2024-01-01T00:00:00Z", "1", TransactionStatus::Confirmed);
        miss.hash = "0xdead".to_string();
        miss.from_address = "0xdead".to_string();
        miss.to_address = "0xdead".to_string();

        let txs = vec![hit, miss];
        let view = query(&txs, &QueryParams::default().with_search("0xabc"));
        assert_eq!(ids(&view.transactions), vec!["hit"]);
    }

    #[test]
    fn test_search_matches_any_of_three_fields() {
        let mut by_to = tx("to", "2024-01-01T00:00:00Z", "1", TransactionStatus::Confirmed);
        by_to.to_address = "0xFEEDbeef".to_string();
        let mut by_from = tx("from", "2024-01-01T00:00:00Z", "1", TransactionStatus::Confirmed);
        by_from.from_address = "0xfeedBEEF".to_string();
        let txs = vec![by_to, by_from, tx("none", "2024-01-01T00:00:00Z", "1", TransactionStatus::Confirmed)];

        let view = query(&txs, &QueryParams::default().with_search("  FEEDBEEF "));
        assert_eq!(view.total_count, 2);
    }

    #[test]
    fn test_blank_search_is_no_search() {
        let txs = sample();
        let view = query(&txs, &QueryParams::default().with_search("   "));
        assert_eq!(view.total_count, txs.len());
    }

    #[test]
    fn test_status_filter() {
        let txs = sample();
        let view = query(&txs, &QueryParams::default().with_status_filter(StatusFilter::Pending));
        assert_eq!(view.total_count, 2);
        assert!(view.transactions.iter().all(|t| t.status == TransactionStatus::Pending));
    }

    #[test]
    fn test_date_range_inclusive_and_drops_unparseable() {
        let txs = sample();
        let from = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let params = QueryParams::default()
            .with_date_range(Some(from), Some(to))
            .with_sort(SortState::new(SortField::Date, SortOrder::Asc));
        let view = query(&txs, &params);
        assert_eq!(ids(&view.transactions), vec!["d", "b", "e"]);
    }

    #[test]
    fn test_unparseable_dates_kept_without_bounds() {
        let txs = sample();
        let view = query(&txs, &QueryParams::default());
        assert!(view.transactions.iter().any(|t| t.id == "c"));
    }

    #[test]
    fn test_date_sort_places_unparseable_smallest() {
        let txs = sample();
        let asc = QueryParams::default().with_sort(SortState::new(SortField::Date, SortOrder::Asc));
        assert_eq!(ids(&query(&txs, &asc).transactions), vec!["c", "a", "d", "b", "e"]);

        let desc = QueryParams::default();
        assert_eq!(ids(&query(&txs, &desc).transactions), vec!["e", "b", "d", "a", "c"]);
    }

    #[test]
    fn test_amount_sort_coerces_unparseable_to_zero() {
        let txs = sample();
        let asc = QueryParams::default().with_sort(SortState::new(SortField::Amount, SortOrder::Asc));
        assert_eq!(ids(&query(&txs, &asc).transactions), vec!["d", "e", "b", "c", "a"]);
    }

    #[test]
    fn test_status_sort_lexicographic_and_stable() {
        let txs = sample();
        let asc = QueryParams::default().with_sort(SortState::new(SortField::Status, SortOrder::Asc));
        assert_eq!(ids(&query(&txs, &asc).transactions), vec!["a", "d", "c", "b", "e"]);

        let desc = QueryParams::default().with_sort(SortState::new(SortField::Status, SortOrder::Desc));
        assert_eq!(ids(&query(&txs, &desc).transactions), vec!["b", "e", "c", "a", "d"]);
    }

    #[test]
    fn test_empty_result_pagination() {
        let view = query(&[], &QueryParams::default().with_page(4));
        assert_eq!(view.total_count, 0);
        assert_eq!(view.total_pages, 0);
        assert_eq!((view.range_start, view.range_end), (0, 0));
        assert_eq!(view.page, 1);
        assert!(view.transactions.is_empty());
        assert!(!view.has_next());
        assert!(!view.has_previous());
    }

    #[test]
    fn test_page_clamped_to_last_page() {
        let txs: Vec<Transaction> = (0..20)
            .map(|i| tx(&i.to_string(), "2024-01-01T00:00:00Z", "1", TransactionStatus::Confirmed))
            .collect();
        let view = query(&txs, &QueryParams::default().with_page(9999));
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.page, 2);
        assert_eq!(view.transactions.len(), 5);
        assert_eq!((view.range_start, view.range_end), (16, 20));
    }

    #[test]
    fn test_page_zero_clamped_to_first() {
        let txs = sample();
        let view = query(&txs, &QueryParams::default().with_page_size(2).with_page(0));
        assert_eq!(view.page, 1);
        assert_eq!((view.range_start, view.range_end), (1, 2));
        assert!(view.has_next());
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let txs = sample();
        let params = QueryParams { page_size: 0, ..QueryParams::default() };
        let view = query(&txs, &params);
        assert_eq!(view.page_size, 1);
        assert_eq!(view.total_pages, txs.len());
    }

    #[test]
    fn test_input_not_mutated() {
        let txs = sample();
        let before = txs.clone();
        let _ = query(&txs, &QueryParams::default().select_sort(SortField::Amount));
        assert_eq!(txs, before);
    }

    #[test]
    fn test_sort_toggle_law() {
        let state = SortState::default();
        assert_eq!(state, SortState::new(SortField::Date, SortOrder::Desc));

        let amount = state.select(SortField::Amount);
        assert_eq!(amount.order, SortOrder::Desc);
        let amount = amount.select(SortField::Amount);
        assert_eq!(amount.order, SortOrder::Asc);
        let amount = amount.select(SortField::Amount);
        assert_eq!(amount.order, SortOrder::Desc);

        let status = amount.select(SortField::Amount).select(SortField::Status);
        assert_eq!(status, SortState::new(SortField::Status, SortOrder::Desc));
    }

    #[test]
    fn test_param_changes_reset_page() {
        let params = QueryParams::default().with_page(5);
        assert_eq!(params.clone().select_sort(SortField::Amount).page, 1);
        assert_eq!(params.clone().with_search("x").page, 1);
        assert_eq!(params.clone().with_status_filter(StatusFilter::Failed).page, 1);
        assert_eq!(params.clone().with_date_range(None, None).page, 1);
        assert_eq!(params.with_page_size(30).page, 1);
    }

    #[test]
    fn test_from_map_parses_and_falls_back() {
        let mut map = HashMap::new();
        map.insert("status".to_string(), "failed".to_string());
        map.insert("from".to_string(), "2024-01-01".to_string());
        map.insert("to".to_string(), "not-a-date".to_string());
        map.insert("q".to_string(), "0xabc".to_string());
        map.insert("sort".to_string(), "amount".to_string());
        map.insert("order".to_string(), "sideways".to_string());
        map.insert("page".to_string(), "3".to_string());
        map.insert("page_size".to_string(), "0".to_string());

        let params = QueryParams::from_map(&map, 15);
        assert_eq!(params.status_filter, StatusFilter::Failed);
        assert_eq!(params.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(params.date_to, None);
        assert_eq!(params.search_query, "0xabc");
        assert_eq!(params.sort_field, SortField::Amount);
        assert_eq!(params.sort_order, SortOrder::Desc);
        assert_eq!(params.page, 3);
        assert_eq!(params.page_size, 15);
        assert!(params.has_filters());
    }

    #[test]
    fn test_from_empty_map_is_default() {
        let params = QueryParams::from_map(&HashMap::new(), 15);
        assert_eq!(params, QueryParams::default());
        assert!(!params.has_filters());
    }

    #[test]
    fn test_empty_state_classification() {
        let txs = sample();
        let none = query(&txs, &QueryParams::default().with_search("nothing-matches"));
        assert_eq!(none.empty_state(txs.len()), Some(EmptyState::NoMatches));

        let empty = query(&[], &QueryParams::default());
        assert_eq!(empty.empty_state(0), Some(EmptyState::NoData));

        let some = query(&txs, &QueryParams::default());
        assert_eq!(some.empty_state(txs.len()), None);
    }

    #[test]
    fn test_status_counts() {
        let counts = StatusCounts::tally(&sample());
        assert_eq!(counts, StatusCounts { total: 5, pending: 2, confirmed: 2, failed: 1 });
    }

    // ==================== Property tests ====================

    fn arb_status() -> impl Strategy<Value = TransactionStatus> {
        prop_oneof![
            Just(TransactionStatus::Pending),
            Just(TransactionStatus::Confirmed),
            Just(TransactionStatus::Failed),
        ]
    }

    fn arb_transactions() -> impl Strategy<Value = Vec<Transaction>> {
        let timestamps = prop::sample::select(vec![
            "2024-01-01T10:00:00Z",
            "2024-01-02T10:00:00Z",
            "2024-01-02T10:00:00Z",
            "2024-01-03T00:00:00Z",
            "garbage",
            "",
        ]);
        let amounts = prop::sample::select(vec!["0.2", "1.5", "1.5", "10", "-3", "bad", "0", "-0"]);
        let hashes = prop::sample::select(vec!["0xABCdef", "0xabc123", "0xdead", "0xbeef"]);
        prop::collection::vec((arb_status(), timestamps, amounts, hashes), 0..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (status, ts, amount, hash))| {
                    let mut t = tx(&i.to_string(), ts, amount, status);
                    t.hash = hash.to_string();
                    t
                })
                .collect()
        })
    }

    fn arb_params() -> impl Strategy<Value = QueryParams> {
        let fields = prop_oneof![Just(SortField::Date), Just(SortField::Amount), Just(SortField::Status)];
        let orders = prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)];
        let filters = prop_oneof![
            Just(StatusFilter::All),
            Just(StatusFilter::Pending),
            Just(StatusFilter::Confirmed),
            Just(StatusFilter::Failed),
        ];
        let searches = prop::sample::select(vec!["", "0xabc", "DEAD", "  "]);
        (fields, orders, filters, searches, 0usize..30, 1usize..20).prop_map(
            |(sort_field, sort_order, status_filter, search, page, page_size)| QueryParams {
                status_filter,
                search_query: search.to_string(),
                sort_field,
                sort_order,
                page,
                page_size,
                ..QueryParams::default()
            },
        )
    }

    fn original_index(tx: &Transaction) -> usize {
        tx.id.parse().unwrap()
    }

    proptest! {
        #[test]
        fn prop_query_is_idempotent(txs in arb_transactions(), params in arb_params()) {
            prop_assert_eq!(query(&txs, &params), query(&txs, &params));
        }

        #[test]
        fn prop_filters_never_grow_results(txs in arb_transactions(), params in arb_params()) {
            let base = query(&txs, &params);
            prop_assert!(base.total_count <= txs.len());

            let from = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            let narrowed = query(&txs, &params.clone().with_date_range(Some(from), None));
            prop_assert!(narrowed.total_count <= base.total_count);
        }

        #[test]
        fn prop_sort_is_stable(txs in arb_transactions(), params in arb_params()) {
            let rows = filter_and_sort(&txs, &params);
            for pair in rows.windows(2) {
                let a = SortKey::of(pair[0], params.sort_field);
                let b = SortKey::of(pair[1], params.sort_field);
                if a.compare(&b) == Ordering::Equal {
                    prop_assert!(original_index(pair[0]) < original_index(pair[1]));
                }
            }
        }

        #[test]
        fn prop_pages_cover_result_exactly_once(txs in arb_transactions(), params in arb_params()) {
            let expected: Vec<Transaction> = filter_and_sort(&txs, &params).into_iter().cloned().collect();
            let first = query(&txs, &params.clone().with_page(1));
            let mut collected = Vec::new();
            for page in 1..=first.total_pages {
                collected.extend(query(&txs, &params.clone().with_page(page)).transactions);
            }
            prop_assert_eq!(collected, expected);
        }

        #[test]
        fn prop_out_of_range_page_returns_last_page(txs in arb_transactions(), params in arb_params()) {
            let view = query(&txs, &params.clone().with_page(9999));
            if view.total_count > 0 {
                prop_assert_eq!(view.page, view.total_pages);
                prop_assert!(!view.transactions.is_empty());
                prop_assert_eq!(view.range_end, view.total_count);
            }
        }
    }
}
