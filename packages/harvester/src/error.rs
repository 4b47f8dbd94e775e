//! Typed errors for the harvest pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failure kind. Everything here is fatal for the invocation: the
//! worker surfaces the error and exits, and the lease bump applied at claim
//! time acts as the retry backoff. Duplicate-key inserts are deliberately
//! not represented here; they are the poll-mode "caught up" signal.

use thiserror::Error;

/// Errors that can abort one harvest invocation.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Another worker holds the shared claim lock right now.
    #[error("claim lock unavailable")]
    LockUnavailable,

    /// The outbound page fetch failed (network or HTTP status).
    #[error("feed fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The response body could not be recovered into a parseable document.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
