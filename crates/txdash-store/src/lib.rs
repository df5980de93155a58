//! Persistence and data access for the transaction dashboard
//!
//! - [`TransactionSource`]: where transactions come from (JSON file by default)
//! - [`KeyValueStore`]: small string storage for the form draft and theme
//! - [`Dashboard`]: the current snapshot and the operations the UI runs on it

pub mod dashboard;
pub mod draft;
pub mod error;
pub mod kv;
pub mod source;
pub mod theme;

pub use dashboard::Dashboard;
pub use draft::{DraftStore, DRAFT_KEY};
pub use error::{StoreError, StoreResult};
pub use kv::{FileStore, KeyValueStore, KeyValueStoreRef, MemoryStore};
pub use source::{generate_hash, JsonFileSource, TransactionSource, TransactionSourceRef};
pub use theme::{ThemeStore, THEME_KEY};
