//! Core transaction model and query logic
//!
//! Everything here is pure: the dashboard's filtering, sorting, pagination,
//! creation validation and CSV export operate on in-memory snapshots.

pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod time;
pub mod types;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails};
pub use export::{export_filename, to_csv, CSV_HEADER};
pub use models::{
    is_valid_address, CreateTransactionRequest, NewTransaction, Transaction, TransactionDraft,
    DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE,
};
pub use query::{
    filter_and_sort, query, EmptyState, QueryParams, QueryView, SortState, StatusCounts,
    DEFAULT_PAGE_SIZE,
};
pub use time::{end_of_day, start_of_day, DateBounds, TimeFilter};
pub use types::{SortField, SortOrder, StatusFilter, TransactionStatus};
