//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints (and HTMX endpoints for transactions)
//! - page.rs: HTMX page rendering

pub mod drafts;
pub mod settings;
pub mod transactions;

use std::collections::HashMap;
use txdash_core::TransactionDraft;

/// Decode an `application/x-www-form-urlencoded` body
pub(crate) fn parse_form(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let decode = |raw: &str| {
            let raw = raw.replace('+', " ");
            match urlencoding::decode(&raw) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => raw.clone(),
            }
        };
        params.insert(decode(key), decode(value));
    }
    params
}

/// Creation form fields as a draft
pub(crate) fn draft_from_form(params: &HashMap<String, String>) -> TransactionDraft {
    let field = |name: &str| params.get(name).cloned().unwrap_or_default();
    TransactionDraft {
        to_address: field("toAddress"),
        amount: field("amount"),
        gas_limit: field("gasLimit"),
        gas_price: field("gasPrice"),
    }
}
