//! Rate store port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory mocks) implement this trait.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{CurrencyPair, RateSample, RateStatistics};
use crate::error::RepoError;

/// The main repository port for rate samples.
///
/// The table is append-only: rows are inserted, never updated, and deleted
/// only in bulk via retention pruning. All range reads return samples
/// ordered ascending by `timestamp`.
#[async_trait::async_trait]
pub trait RateRepository: Send + Sync + 'static {
    /// Appends one sample.
    async fn save(&self, sample: &RateSample) -> Result<(), RepoError>;

    /// Appends all samples of one ingestion run in a single transaction,
    /// so a run's successful fetches become visible all-or-nothing.
    async fn save_all(&self, samples: &[RateSample]) -> Result<(), RepoError>;

    /// All samples for `pair` with `timestamp >= now - 24h`, ascending.
    async fn find_last_24_hours(&self, pair: CurrencyPair)
    -> Result<Vec<RateSample>, RepoError>;

    /// All samples for `pair` within the UTC calendar day, ascending.
    async fn find_by_day(
        &self,
        pair: CurrencyPair,
        date: NaiveDate,
    ) -> Result<Vec<RateSample>, RepoError>;

    /// The single most recent sample for `pair`, if any.
    async fn find_latest_by_pair(
        &self,
        pair: CurrencyPair,
    ) -> Result<Option<RateSample>, RepoError>;

    /// Deletes all samples older than `days_to_keep` days.
    /// Returns the number of rows removed.
    async fn cleanup_old_rates(&self, days_to_keep: u32) -> Result<u64, RepoError>;

    /// Aggregate statistics over `[from, to]` inclusive.
    async fn statistics(
        &self,
        pair: CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<RateStatistics, RepoError>;
}
