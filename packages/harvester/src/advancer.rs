//! Pagination state machine: computes the next source state after a page.
//!
//! Two states, keyed off the `finished` flag: backfilling walks toward the
//! oldest content until a terminal page flips the source into polling;
//! polling pages deeper until a duplicate insert shows the sweep has reached
//! previously-seen content, then parks the source until the next calendar
//! day. The result is committed as a single row update, and only after the
//! store step succeeded.

use chrono::{DateTime, Days, Duration, NaiveTime, Utc};

use crate::types::{PageFacts, SourceUpdate, SweepMode};

/// Compute the post-page state for a source.
pub fn plan(
    mode: SweepMode,
    facts: &PageFacts,
    now: DateTime<Utc>,
    lease: Duration,
) -> SourceUpdate {
    if facts.is_final {
        // Terminal page: nothing older to backfill. Park until tomorrow and
        // poll from the top from now on.
        return SourceUpdate {
            finished: true,
            cursor: None,
            next_eligible_at: next_day_start(now),
        };
    }

    match mode {
        SweepMode::Backfilling => SourceUpdate {
            finished: false,
            cursor: facts.next_cursor.clone(),
            next_eligible_at: now + lease,
        },
        SweepMode::Polling if facts.store.duplicates > 0 => {
            // Reached previously-seen content: nothing new right now,
            // regardless of how many inserts the same page carried.
            SourceUpdate {
                finished: true,
                cursor: None,
                next_eligible_at: next_day_start(now),
            }
        }
        SweepMode::Polling => SourceUpdate {
            finished: true,
            cursor: facts.next_cursor.clone(),
            next_eligible_at: now + lease,
        },
    }
}

/// Midnight UTC of the following calendar day.
pub fn next_day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    (now.date_naive() + Days::new(1))
        .and_time(NaiveTime::MIN)
        .and_utc()
}
