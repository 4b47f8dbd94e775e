use chrono::{DateTime, Utc};

/// Pagination mode for a source.
///
/// A backfill sweep walks the feed from its resume point toward the oldest
/// available content; once a terminal page is seen the source flips to
/// polling, which looks for newly published items since the last visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    Backfilling,
    Polling,
}

impl SweepMode {
    pub fn from_finished(finished: bool) -> Self {
        if finished {
            SweepMode::Polling
        } else {
            SweepMode::Backfilling
        }
    }
}

/// One row of the `sources` table: a feed to harvest.
///
/// Rows are created out-of-band; the worker only bumps the lease on claim
/// and commits the post-page state.
#[derive(Debug, Clone)]
pub struct Source {
    pub id: String,
    pub finished: bool,
    pub cursor: Option<String>,
    pub next_eligible_at: DateTime<Utc>,
}

impl Source {
    pub fn mode(&self) -> SweepMode {
        SweepMode::from_finished(self.finished)
    }
}

/// Item candidate pulled from one feed edge.
///
/// `key` is `None` when the edge carried no feedback identifier; the writer
/// skips such drafts without treating them as a failure.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub key: Option<String>,
    pub external_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub thread_id: Option<String>,
}

/// Extraction output for one page.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub drafts: Vec<ItemDraft>,
    /// Continuation token attached to the last edge, if any.
    pub next_cursor: Option<String>,
}

/// Counts reported by one `store` pass over a page of drafts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreResult {
    pub inserted: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

/// Facts gathered about one fetched page, threaded through the pipeline
/// stages instead of shared mutable state.
#[derive(Debug, Clone)]
pub struct PageFacts {
    pub is_final: bool,
    pub next_cursor: Option<String>,
    pub store: StoreResult,
}

/// The post-page state committed back to the source row as one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUpdate {
    pub finished: bool,
    pub cursor: Option<String>,
    pub next_eligible_at: DateTime<Utc>,
}
