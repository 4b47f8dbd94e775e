//! PostgreSQL-backed storage for the harvest worker.
//!
//! The claim operation is one short transaction: take the shared advisory
//! lock, select a due source, bump its lease, commit. The lock is never held
//! across the fetch; the lease bump alone keeps other workers off the source
//! for the horizon.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{HarvestStore, InsertOutcome};
use crate::error::HarvestError;
use crate::types::{ItemDraft, Source, SourceUpdate};

/// Advisory lock key shared by every worker claiming sources.
const CLAIM_LOCK_KEY: i64 = 1;

/// Default lease horizon applied at claim time, in seconds.
const DEFAULT_LEASE_SECONDS: i64 = 15;

pub struct PostgresHarvestStore {
    pool: PgPool,
    lease_seconds: i64,
}

impl PostgresHarvestStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lease_seconds: DEFAULT_LEASE_SECONDS,
        }
    }

    /// Create with a custom lease horizon.
    pub fn with_lease_seconds(pool: PgPool, lease_seconds: i64) -> Self {
        Self {
            pool,
            lease_seconds,
        }
    }

    pub fn lease_seconds(&self) -> i64 {
        self.lease_seconds
    }
}

#[async_trait]
impl HarvestStore for PostgresHarvestStore {
    async fn claim_due_source(&self) -> Result<Option<Source>, HarvestError> {
        let mut tx = self.pool.begin().await?;

        let locked: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
            .bind(CLAIM_LOCK_KEY)
            .fetch_one(&mut *tx)
            .await?;
        if !locked {
            return Err(HarvestError::LockUnavailable);
        }

        let row = sqlx::query(
            r#"
            SELECT id, finished, cursor, next_eligible_at
            FROM sources
            WHERE next_eligible_at < NOW()
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.commit().await?;
            return Ok(None);
        };

        let source = Source {
            id: row.get("id"),
            finished: row.get("finished"),
            cursor: row.get("cursor"),
            next_eligible_at: row.get("next_eligible_at"),
        };

        sqlx::query(
            r#"
            UPDATE sources
            SET next_eligible_at = NOW() + ($1 || ' seconds')::INTERVAL
            WHERE id = $2
            "#,
        )
        .bind(self.lease_seconds.to_string())
        .bind(&source.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            source_id = %source.id,
            lease_seconds = self.lease_seconds,
            "source claimed and lease bumped"
        );

        Ok(Some(source))
    }

    async fn insert_item(
        &self,
        source_id: &str,
        key: &str,
        draft: &ItemDraft,
    ) -> Result<InsertOutcome, HarvestError> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (item_key, source_id, external_id, created_at, url, text, thread_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (item_key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(source_id)
        .bind(draft.external_id.as_deref())
        .bind(draft.created_at)
        .bind(draft.url.as_deref())
        .bind(draft.text.as_deref())
        .bind(draft.thread_id.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::Duplicate)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn commit_source_state(
        &self,
        source_id: &str,
        update: &SourceUpdate,
    ) -> Result<(), HarvestError> {
        sqlx::query(
            r#"
            UPDATE sources
            SET finished = $1,
                cursor = $2,
                next_eligible_at = $3
            WHERE id = $4
            "#,
        )
        .bind(update.finished)
        .bind(update.cursor.as_deref())
        .bind(update.next_eligible_at)
        .bind(source_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
