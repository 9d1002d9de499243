//! Upstream rate feed port.
//!
//! Adapters (the Binance HTTP client, test mocks) implement this trait.

use rust_decimal::Decimal;

use crate::domain::CurrencyPair;
use crate::error::{FeedError, PairFailure};

/// Outcome of a multi-pair fetch.
///
/// Partial success is a first-class state: pairs that failed are carried
/// alongside the ones that succeeded instead of aborting the whole fetch.
#[derive(Debug, Clone, Default)]
pub struct RateBatch {
    /// Successfully fetched rates, in supported-pair order.
    pub rates: Vec<(CurrencyPair, Decimal)>,
    /// Pairs that could not be fetched, with the reason.
    pub failures: Vec<PairFailure>,
}

/// Port trait for upstream price feeds.
#[async_trait::async_trait]
pub trait RateFeed: Send + Sync + 'static {
    /// Fetches the current rate for one pair.
    ///
    /// Returns EUR priced in the pair's quote currency, i.e. the reciprocal
    /// of the upstream "crypto priced in EUR" quote.
    async fn fetch_rate(&self, pair: CurrencyPair) -> Result<Decimal, FeedError>;

    /// Fetches every supported pair independently.
    ///
    /// A failing pair never aborts the others. Errs only with
    /// [`FeedError::AllRatesFailed`] when no pair could be fetched.
    async fn fetch_all_rates(&self) -> Result<RateBatch, FeedError>;

    /// Lightweight upstream liveness probe. Never errors.
    async fn is_available(&self) -> bool;

    /// The closed set of pairs this feed serves, in stable order.
    fn supported_pairs(&self) -> &'static [CurrencyPair] {
        CurrencyPair::all()
    }
}
