//! Data Transfer Objects for API responses.
//!
//! Rates are exact decimals in the domain and the store; they are converted
//! to floating point here, at the JSON boundary, for client convenience.

use chrono::{NaiveDate, SecondsFormat};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CurrencyPair, RateSample, RateStatistics};

// ─────────────────────────────────────────────────────────────────────────────
// Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// One rate observation inside a range response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatePoint {
    /// Rate as a float (exact decimal in storage)
    #[schema(example = 0.000025)]
    pub rate: f64,
    /// Sampling instant as unix seconds
    #[schema(example = 1736337599)]
    pub timestamp: i64,
    /// Sampling instant as ISO-8601 UTC
    #[schema(example = "2025-01-08T11:59:59Z")]
    pub timestamp_iso: String,
}

impl RatePoint {
    pub fn from_sample(sample: &RateSample) -> Self {
        Self {
            rate: sample.rate.to_f64().unwrap_or_default(),
            timestamp: sample.timestamp.timestamp(),
            timestamp_iso: sample
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Response for the rolling 24 hour window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Last24HoursResponse {
    pub pair: CurrencyPair,
    /// Always `last-24h`
    #[schema(example = "last-24h")]
    pub period: String,
    pub count: usize,
    pub rates: Vec<RatePoint>,
}

impl Last24HoursResponse {
    pub fn new(pair: CurrencyPair, samples: &[RateSample]) -> Self {
        Self {
            pair,
            period: "last-24h".to_string(),
            count: samples.len(),
            rates: samples.iter().map(RatePoint::from_sample).collect(),
        }
    }
}

/// Response for a single calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayResponse {
    pub pair: CurrencyPair,
    #[schema(value_type = String, example = "2025-01-08")]
    pub date: NaiveDate,
    pub count: usize,
    pub rates: Vec<RatePoint>,
}

impl DayResponse {
    pub fn new(pair: CurrencyPair, date: NaiveDate, samples: &[RateSample]) -> Self {
        Self {
            pair,
            date,
            count: samples.len(),
            rates: samples.iter().map(RatePoint::from_sample).collect(),
        }
    }
}

/// The most recent sample for one pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LatestRate {
    pub pair: CurrencyPair,
    #[schema(example = 0.000025)]
    pub rate: f64,
    #[schema(example = 1736337599)]
    pub timestamp: i64,
    #[schema(example = "2025-01-08T11:59:59Z")]
    pub timestamp_iso: String,
}

impl LatestRate {
    pub fn from_sample(sample: &RateSample) -> Self {
        Self {
            pair: sample.pair,
            rate: sample.rate.to_f64().unwrap_or_default(),
            timestamp: sample.timestamp.timestamp(),
            timestamp_iso: sample
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Latest sample for every pair that has at least one row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LatestAllResponse {
    pub rates: Vec<LatestRate>,
    pub count: usize,
}

/// Static echo of the closed pair set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PairsResponse {
    #[schema(example = json!(["EUR/BTC", "EUR/ETH", "EUR/LTC"]))]
    pub supported_pairs: Vec<String>,
    pub count: usize,
}

impl PairsResponse {
    pub fn current() -> Self {
        let supported_pairs: Vec<String> = CurrencyPair::all()
            .iter()
            .map(|p| p.code().to_string())
            .collect();
        let count = supported_pairs.len();
        Self {
            supported_pairs,
            count,
        }
    }
}

/// Aggregate statistics over a time range.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsResponse {
    pub pair: CurrencyPair,
    #[schema(example = "2025-01-01T00:00:00Z")]
    pub from: String,
    #[schema(example = "2025-01-08T00:00:00Z")]
    pub to: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
}

impl StatisticsResponse {
    pub fn new(
        pair: CurrencyPair,
        from: String,
        to: String,
        stats: &RateStatistics,
    ) -> Self {
        Self {
            pair,
            from,
            to,
            count: stats.count,
            min: stats.min.and_then(|d| d.to_f64()),
            max: stats.max.and_then(|d| d.to_f64()),
            avg: stats.avg.and_then(|d| d.to_f64()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Uniform error body for all non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Error category, e.g. `Bad Request`
    #[schema(example = "Bad Request")]
    pub error: String,
    /// Human-readable detail
    pub message: String,
    /// When the error was produced (ISO-8601 UTC)
    #[schema(example = "2025-01-08T12:00:00Z")]
    pub timestamp: String,
    /// Request path that produced the error
    #[schema(example = "/rates/last-24h")]
    pub path: String,
}
