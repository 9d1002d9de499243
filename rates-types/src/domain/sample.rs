//! Rate sample domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pair::CurrencyPair;
use crate::error::DomainError;

/// Unique identifier for a RateSample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateSampleId(Uuid);

impl RateSampleId {
    /// Creates a new random RateSampleId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a RateSampleId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for RateSampleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RateSampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RateSampleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One persisted observation of a pair's rate at a point in time.
///
/// Samples are immutable once created - they are a historical record and
/// only ever leave the store through bulk retention pruning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSample {
    /// Unique identifier
    pub id: RateSampleId,
    /// The quoted pair
    pub pair: CurrencyPair,
    /// EUR priced in the pair's quote currency, exact decimal
    pub rate: Decimal,
    /// Business time of the quote (the run timestamp, not insertion time)
    pub timestamp: DateTime<Utc>,
    /// Wall-clock instant the row was inserted
    pub created_at: DateTime<Utc>,
}

impl RateSample {
    /// Creates a new sample.
    ///
    /// # Validation
    /// - Rate must be strictly positive
    pub fn new(
        pair: CurrencyPair,
        rate: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if rate <= Decimal::ZERO {
            return Err(DomainError::NonPositiveRate(rate));
        }

        Ok(Self {
            id: RateSampleId::new(),
            pair,
            rate,
            timestamp,
            created_at: Utc::now(),
        })
    }

    /// Reconstructs a sample from database fields.
    pub fn from_parts(
        id: RateSampleId,
        pair: CurrencyPair,
        rate: Decimal,
        timestamp: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            pair,
            rate,
            timestamp,
            created_at,
        }
    }
}

/// Aggregate view over a range of samples.
///
/// `min`/`max`/`avg` are `None` when the range holds no samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateStatistics {
    pub count: u64,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub avg: Option<Decimal>,
}

impl RateStatistics {
    /// Statistics of an empty range.
    pub fn empty() -> Self {
        Self {
            count: 0,
            min: None,
            max: None,
            avg: None,
        }
    }

    /// Folds a sequence of rate values into count/min/max/avg.
    pub fn from_rates(rates: &[Decimal]) -> Self {
        if rates.is_empty() {
            return Self::empty();
        }

        let mut min = rates[0];
        let mut max = rates[0];
        let mut sum = Decimal::ZERO;
        for rate in rates {
            if *rate < min {
                min = *rate;
            }
            if *rate > max {
                max = *rate;
            }
            sum += *rate;
        }

        let count = rates.len() as u64;
        Self {
            count,
            min: Some(min),
            max: Some(max),
            avg: Some(sum / Decimal::from(count)),
        }
    }
}
