//! Transaction routes - List, filters, sort, pagination, detail, create, export
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page rendering and HTML helpers

pub mod api;
pub mod page;

pub use api::{
    api_transaction_create,
    api_transaction_detail,
    api_transactions,
    api_transactions_export,
    htmx_transaction_create_form,
    htmx_transaction_detail,
    htmx_transaction_store,
    htmx_transactions_list,
};

pub use page::page_transactions;
