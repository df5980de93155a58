//! Persisted light/dark preference

use txdash_config::Theme;

use crate::error::StoreResult;
use crate::kv::KeyValueStoreRef;

/// Storage key of the theme preference
pub const THEME_KEY: &str = "txdash.theme";

#[derive(Clone)]
pub struct ThemeStore {
    kv: KeyValueStoreRef,
    default: Theme,
}

impl ThemeStore {
    pub fn new(kv: KeyValueStoreRef, default: Theme) -> Self {
        Self { kv, default }
    }

    /// Saved theme, or the default when missing or unrecognised
    pub async fn load(&self) -> StoreResult<Theme> {
        let theme = match self.kv.get(THEME_KEY).await? {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("{}, falling back to {}", e, self.default);
                self.default
            }),
            None => self.default,
        };
        Ok(theme)
    }

    pub async fn save(&self, theme: Theme) -> StoreResult<()> {
        self.kv.set(THEME_KEY, theme.to_string()).await
    }

    /// Flip the saved theme and return the new one
    pub async fn toggle(&self) -> StoreResult<Theme> {
        let next = self.load().await?.toggle();
        self.save(next).await?;
        log::info!("Theme switched to {}", next);
        Ok(next)
    }
}
