//! Rate Query Service
//!
//! Orchestrates read operations through the repository port.
//! Contains NO infrastructure logic - pure business orchestration.

use chrono::{DateTime, NaiveDate, Utc};

use rates_types::{AppError, CurrencyPair, RateRepository, RateSample, RateStatistics};

/// Application service for rate queries and store maintenance.
///
/// Generic over `R: RateRepository` - the adapter is injected at compile time.
/// This enables:
/// - Swapping repositories without code changes
/// - Testing with an in-memory repo
/// - Compile-time checks for port implementation
pub struct RateService<R: RateRepository> {
    repo: R,
}

impl<R: RateRepository> RateService<R> {
    /// Creates a new rate service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// The closed pair set, in stable order.
    pub fn supported_pairs(&self) -> &'static [CurrencyPair] {
        CurrencyPair::all()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Samples for `pair` over the rolling last 24 hours, ascending.
    pub async fn last_24_hours(&self, pair: CurrencyPair) -> Result<Vec<RateSample>, AppError> {
        self.repo.find_last_24_hours(pair).await.map_err(Into::into)
    }

    /// Samples for `pair` on a calendar day, ascending.
    ///
    /// A date after today (UTC) is rejected up front; the store is never
    /// asked for a day that cannot have samples yet.
    pub async fn by_day(
        &self,
        pair: CurrencyPair,
        date: NaiveDate,
    ) -> Result<Vec<RateSample>, AppError> {
        let today = Utc::now().date_naive();
        if date > today {
            return Err(AppError::InvalidDate(date.to_string()));
        }

        self.repo.find_by_day(pair, date).await.map_err(Into::into)
    }

    /// The most recent sample for `pair`.
    pub async fn latest(&self, pair: CurrencyPair) -> Result<RateSample, AppError> {
        self.repo
            .find_latest_by_pair(pair)
            .await
            .map_err(Into::into)
            .and_then(|opt| {
                opt.ok_or_else(|| AppError::NotFound(format!("No rates found for pair {}", pair)))
            })
    }

    /// The most recent sample for every pair that has at least one row.
    /// Pairs without samples are omitted, not errors.
    pub async fn latest_all(&self) -> Result<Vec<RateSample>, AppError> {
        let mut latest = Vec::new();
        for pair in CurrencyPair::all() {
            if let Some(sample) = self
                .repo
                .find_latest_by_pair(*pair)
                .await
                .map_err(AppError::from)?
            {
                latest.push(sample);
            }
        }
        Ok(latest)
    }

    /// Aggregate statistics over `[from, to]` inclusive.
    pub async fn statistics(
        &self,
        pair: CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<RateStatistics, AppError> {
        if from > to {
            return Err(AppError::Validation(
                "`from` must not be after `to`".into(),
            ));
        }

        self.repo.statistics(pair, from, to).await.map_err(Into::into)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Maintenance
    // ─────────────────────────────────────────────────────────────────────────────

    /// Deletes samples older than `days_to_keep` days; returns the count.
    ///
    /// Exposed for the maintenance CLI, never scheduled in-process.
    pub async fn cleanup(&self, days_to_keep: u32) -> Result<u64, AppError> {
        if days_to_keep == 0 {
            return Err(AppError::Validation(
                "days_to_keep must be at least 1".into(),
            ));
        }

        self.repo
            .cleanup_old_rates(days_to_keep)
            .await
            .map_err(Into::into)
    }
}
