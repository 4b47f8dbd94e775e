//! Resumable, crash-tolerant worker that harvests a paginated timeline feed
//! into Postgres. Each run claims one due source under a shared lease,
//! fetches one page, recovers and extracts it, stores new items
//! idempotently, and commits the next pagination state.

pub mod advancer;
pub mod config;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod payload;
pub mod pipeline;
pub mod storage;
pub mod types;
pub mod writer;

// Re-exports for clean API
pub use config::Config;
pub use error::HarvestError;
pub use fetch::{FeedFetcher, GraphFeedClient};
pub use pipeline::{Harvester, RunOutcome};
pub use storage::{HarvestStore, InsertOutcome, PostgresHarvestStore};
pub use types::{
    ExtractedPage, ItemDraft, PageFacts, Source, SourceUpdate, StoreResult, SweepMode,
};
