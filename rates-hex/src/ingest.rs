//! Ingestion runner
//!
//! One run of the externally scheduled ingestion job: preflight the feed,
//! fetch the requested pairs, persist the successful fetches as samples
//! sharing a single run timestamp, and report per-pair outcomes.
//!
//! The runner is stateless between invocations. Overlapping runs are not
//! locked against each other; each invocation independently appends rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use rates_types::{
    CurrencyPair, FeedError, PairFailure, RateFeed, RateRepository, RateSample, RepoError,
};

/// Options for a single ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Restrict the run to a single pair instead of the whole set.
    pub pair: Option<CurrencyPair>,
    /// Compute and report rates without persisting anything.
    pub dry_run: bool,
}

/// Outcome of a single ingestion run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// The shared timestamp stamped on every sample of this run,
    /// captured once before the first fetch.
    pub run_timestamp: DateTime<Utc>,
    /// Pairs fetched (and, unless dry-run, persisted) with their rates.
    pub fetched: Vec<(CurrencyPair, Decimal)>,
    /// Pairs that failed to fetch.
    pub failures: Vec<PairFailure>,
    /// Whether persistence was skipped.
    pub dry_run: bool,
}

impl IngestReport {
    /// True only when every attempted pair was fetched and persisted.
    pub fn is_success(&self) -> bool {
        !self.fetched.is_empty() && self.failures.is_empty()
    }

    /// Human-readable per-pair summary for logs and the CLI.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let mode = if self.dry_run { " (dry run)" } else { "" };
        lines.push(format!(
            "run at {}{}: {} fetched, {} failed",
            self.run_timestamp.to_rfc3339(),
            mode,
            self.fetched.len(),
            self.failures.len()
        ));
        for (pair, rate) in &self.fetched {
            lines.push(format!("  ok   {} = {}", pair, rate));
        }
        for failure in &self.failures {
            lines.push(format!("  fail {}", failure));
        }
        lines.join("\n")
    }
}

/// Errors that terminate a run before any per-pair reporting.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Upstream feed is unavailable, run aborted")]
    FeedUnavailable,

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Runs the fetch-and-persist path over injected feed and store ports.
pub struct IngestRunner<R: RateRepository, F: RateFeed> {
    repo: R,
    feed: F,
}

impl<R: RateRepository, F: RateFeed> IngestRunner<R, F> {
    /// Creates a runner over the given adapters.
    pub fn new(repo: R, feed: F) -> Self {
        Self { repo, feed }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Executes one ingestion run.
    ///
    /// Partial success is deliberate: pairs that fetched are persisted even
    /// when others failed, and the report carries both sides. The run errs
    /// only when nothing could be done at all (feed down, every pair failed,
    /// or the store rejected the batch).
    pub async fn run(&self, options: &IngestOptions) -> Result<IngestReport, IngestError> {
        if !self.feed.is_available().await {
            return Err(IngestError::FeedUnavailable);
        }

        // One timestamp for the whole run, taken before the first fetch, so
        // all samples of a run are comparable regardless of fetch latency.
        let run_timestamp = Utc::now();

        let (fetched, failures) = match options.pair {
            Some(pair) => match self.feed.fetch_rate(pair).await {
                Ok(rate) => (vec![(pair, rate)], Vec::new()),
                Err(err) => {
                    tracing::warn!(pair = %pair, error = %err, "failed to fetch rate");
                    return Err(IngestError::Feed(FeedError::AllRatesFailed(vec![
                        PairFailure {
                            pair,
                            reason: err.to_string(),
                        },
                    ])));
                }
            },
            None => {
                let batch = self.feed.fetch_all_rates().await?;
                (batch.rates, batch.failures)
            }
        };

        if options.dry_run {
            tracing::info!(pairs = fetched.len(), "dry run, skipping persistence");
        } else {
            let samples = fetched
                .iter()
                .map(|(pair, rate)| RateSample::new(*pair, *rate, run_timestamp))
                .collect::<Result<Vec<_>, _>>()
                .map_err(RepoError::from)?;

            self.repo.save_all(&samples).await?;
            tracing::info!(pairs = samples.len(), "persisted rate samples");
        }

        Ok(IngestReport {
            run_timestamp,
            fetched,
            failures,
            dry_run: options.dry_run,
        })
    }
}
