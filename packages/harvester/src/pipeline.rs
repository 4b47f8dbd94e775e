//! One harvest pass: claim, fetch, recover, detect, extract, persist,
//! advance. Each invocation processes exactly one page for one source.

use chrono::{Duration, Utc};

use crate::error::HarvestError;
use crate::fetch::FeedFetcher;
use crate::storage::HarvestStore;
use crate::types::{PageFacts, StoreResult};
use crate::{advancer, detector, extractor, payload, writer};

/// Terminal outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No source was due; clean exit.
    NoWorkAvailable,
    /// One page was processed and the source state advanced.
    CompletedPage {
        source_id: String,
        store: StoreResult,
    },
}

pub struct Harvester<S, F> {
    store: S,
    fetcher: F,
    lease: Duration,
}

impl<S: HarvestStore, F: FeedFetcher> Harvester<S, F> {
    pub fn new(store: S, fetcher: F, lease_seconds: i64) -> Self {
        Self {
            store,
            fetcher,
            lease: Duration::seconds(lease_seconds),
        }
    }

    /// Run one pass. Any error leaves the source row untouched beyond the
    /// lease bump applied at claim time, so the same page is retried on the
    /// next scheduled invocation.
    pub async fn run_once(&self) -> Result<RunOutcome, HarvestError> {
        let Some(source) = self.store.claim_due_source().await? else {
            tracing::info!("no sources due");
            return Ok(RunOutcome::NoWorkAvailable);
        };

        let mode = source.mode();
        tracing::info!(source_id = %source.id, ?mode, cursor = ?source.cursor, "claimed source");

        let raw = self
            .fetcher
            .fetch_page(&source.id, source.cursor.as_deref(), mode)
            .await?;

        // The terminal-page check runs on the raw text so a clearly-final
        // page advances the source even if the payload is malformed.
        let facts = if detector::is_final_page(&raw) {
            tracing::info!(source_id = %source.id, "terminal page detected");
            PageFacts {
                is_final: true,
                next_cursor: None,
                store: StoreResult::default(),
            }
        } else {
            let doc = payload::recover(&raw)?;
            let page = extractor::extract_page(&doc);
            tracing::debug!(
                source_id = %source.id,
                edges = page.drafts.len(),
                next_cursor = ?page.next_cursor,
                "page extracted"
            );

            let store = writer::store_page(&self.store, &source.id, &page.drafts).await?;
            tracing::info!(
                source_id = %source.id,
                inserted = store.inserted,
                duplicates = store.duplicates,
                skipped = store.skipped,
                "page persisted"
            );

            PageFacts {
                is_final: false,
                next_cursor: page.next_cursor,
                store,
            }
        };

        let update = advancer::plan(mode, &facts, Utc::now(), self.lease);
        self.store.commit_source_state(&source.id, &update).await?;
        tracing::info!(
            source_id = %source.id,
            finished = update.finished,
            next_eligible_at = %update.next_eligible_at,
            "source state advanced"
        );

        Ok(RunOutcome::CompletedPage {
            source_id: source.id,
            store: facts.store,
        })
    }
}
