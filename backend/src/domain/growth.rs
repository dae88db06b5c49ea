//! Read-only growth rollup for progress displays.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use utoipa::ToSchema;

use super::error::Error;
use super::store::DocumentStore;
use super::user::UserId;

const SECONDS_PER_DAY: u64 = 86_400;

/// Aggregated activity counters for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrowthSnapshot {
    /// Current energy balance.
    pub energy: u64,
    /// Whole days since registration, rounded up and never zero.
    pub days_active: u64,
    /// Posts authored, any kind or visibility.
    pub posts: usize,
    /// Mood journal entries.
    pub mood_entries: usize,
    /// Meditation sessions recorded.
    pub meditation_sessions: usize,
    /// Total meditation time in minutes.
    pub meditation_minutes: u64,
    /// Memory stories written.
    pub memory_stories: usize,
    /// Memorial pages created.
    pub memorials: usize,
}

/// Pure read-side rollup across the document's collections.
pub struct GrowthTracker {
    store: Arc<DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl GrowthTracker {
    /// Construct a tracker over the shared store.
    pub fn new(store: Arc<DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Compute the rollup for `user_id`, or `NotFound` for an unknown user.
    ///
    /// All counts default to zero for an empty history. `days_active`
    /// rounds elapsed time up, so a same-day signup reports one day, never
    /// zero.
    pub fn snapshot(&self, user_id: UserId) -> Result<GrowthSnapshot, Error> {
        let now = self.clock.utc();
        self.store.snapshot(move |doc| {
            let user = doc
                .user_by_id(user_id)
                .ok_or_else(|| Error::not_found("user not found"))?;

            let elapsed_seconds =
                u64::try_from((now - user.created_at).num_seconds()).unwrap_or(0);
            let days_active = elapsed_seconds.div_ceil(SECONDS_PER_DAY).max(1);

            let meditations = doc
                .meditation_records
                .iter()
                .filter(|record| record.user_id == user_id);
            let (meditation_sessions, meditation_minutes) =
                meditations.fold((0usize, 0u64), |(count, minutes), record| {
                    (count + 1, minutes + u64::from(record.minutes))
                });

            Ok(GrowthSnapshot {
                energy: user.energy,
                days_active,
                posts: doc.posts.iter().filter(|p| p.user_id == user_id).count(),
                mood_entries: doc
                    .mood_entries
                    .iter()
                    .filter(|e| e.user_id == user_id)
                    .count(),
                meditation_sessions,
                meditation_minutes,
                memory_stories: doc
                    .memory_stories
                    .iter()
                    .filter(|s| s.user_id == user_id)
                    .count(),
                memorials: doc
                    .memorials
                    .iter()
                    .filter(|m| m.user_id == user_id)
                    .count(),
            })
        })?
    }
}
