//! Settings routes - Configuration display and theme preference

pub mod api;
pub mod page;

pub use api::{api_settings, api_theme, api_theme_toggle};
pub use page::page_settings;
