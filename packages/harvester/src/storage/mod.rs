//! Storage seam for the harvest worker.

use async_trait::async_trait;

use crate::error::HarvestError;
use crate::types::{ItemDraft, Source, SourceUpdate};

mod postgres;
pub use postgres::PostgresHarvestStore;

/// Whether an item insert created a new row or hit an existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Relational storage consumed by the pipeline.
///
/// Implementations must make `claim_due_source` mutually exclusive across
/// worker processes and `insert_item` conflict-tolerant on the item key.
#[async_trait]
pub trait HarvestStore: Send + Sync {
    /// Claim one due source under the shared claim lock.
    ///
    /// Bumps the source's lease before returning its pre-bump snapshot, so a
    /// second worker cannot pick it up within the lease horizon. Returns
    /// `None` when no source is due, which is a clean exit for the caller.
    async fn claim_due_source(&self) -> Result<Option<Source>, HarvestError>;

    /// Insert one item keyed by its feedback token.
    ///
    /// A primary-key conflict reports `Duplicate` instead of failing.
    async fn insert_item(
        &self,
        source_id: &str,
        key: &str,
        draft: &ItemDraft,
    ) -> Result<InsertOutcome, HarvestError>;

    /// Commit the post-page state for a source as one update.
    async fn commit_source_state(
        &self,
        source_id: &str,
        update: &SourceUpdate,
    ) -> Result<(), HarvestError>;
}
