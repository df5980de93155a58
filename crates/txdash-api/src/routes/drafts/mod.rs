//! Draft routes - Creation form persistence

pub mod api;

pub use api::{api_draft, api_draft_clear, api_draft_save};
