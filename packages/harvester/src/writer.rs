//! Idempotent persistence of extracted drafts.
//!
//! Inserts are keyed by the feedback token; a key conflict is counted, not
//! raised, which makes the step safe to replay against the same page under
//! at-least-once delivery. Any other storage failure aborts the invocation.

use crate::error::HarvestError;
use crate::storage::{HarvestStore, InsertOutcome};
use crate::types::{ItemDraft, StoreResult};

/// Store one page of drafts, reporting how many were new, already present,
/// or skipped for lack of a key.
pub async fn store_page<S: HarvestStore + ?Sized>(
    store: &S,
    source_id: &str,
    drafts: &[ItemDraft],
) -> Result<StoreResult, HarvestError> {
    let mut result = StoreResult::default();

    for draft in drafts {
        let Some(key) = draft.key.as_deref() else {
            tracing::debug!(source_id, "edge without feedback id, skipping");
            result.skipped += 1;
            continue;
        };

        match store.insert_item(source_id, key, draft).await? {
            InsertOutcome::Inserted => {
                tracing::info!(source_id, item_key = key, url = ?draft.url, "item stored");
                result.inserted += 1;
            }
            InsertOutcome::Duplicate => {
                tracing::debug!(source_id, item_key = key, "item already present");
                result.duplicates += 1;
            }
        }
    }

    Ok(result)
}
