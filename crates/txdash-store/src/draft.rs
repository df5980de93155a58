//! Persistence of the in-progress creation form

use txdash_core::TransactionDraft;

use crate::error::StoreResult;
use crate::kv::KeyValueStoreRef;

/// Storage key of the creation form draft
pub const DRAFT_KEY: &str = "txdash.transaction-draft";

/// Draft storage over a key-value store
#[derive(Clone)]
pub struct DraftStore {
    kv: KeyValueStoreRef,
}

impl DraftStore {
    pub fn new(kv: KeyValueStoreRef) -> Self {
        Self { kv }
    }

    /// Load the saved draft.
    ///
    /// A blob that no longer deserializes counts as no draft.
    pub async fn load(&self) -> StoreResult<Option<TransactionDraft>> {
        let Some(raw) = self.kv.get(DRAFT_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<TransactionDraft>(&raw) {
            Ok(draft) if draft.is_empty() => Ok(None),
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                log::warn!("Discarding unreadable transaction draft: {}", e);
                Ok(None)
            }
        }
    }

    /// Save the draft; an all-blank draft clears it instead
    pub async fn save(&self, draft: &TransactionDraft) -> StoreResult<()> {
        if draft.is_empty() {
            return self.clear().await;
        }
        let raw = serde_json::to_string(draft)?;
        self.kv.set(DRAFT_KEY, raw).await
    }

    pub async fn clear(&self) -> StoreResult<()> {
        self.kv.clear(DRAFT_KEY).await
    }
}
