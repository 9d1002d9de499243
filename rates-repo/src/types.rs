//! Shared database types with feature-gated fields for SQLite and PostgreSQL.
//!
//! SQLite has no native uuid/decimal/timestamptz, so those columns are TEXT
//! (uuid string, canonical decimal string, RFC3339) and get parsed on the
//! way out. PostgreSQL maps them natively.

use sqlx::FromRow;

use rates_types::{CurrencyPair, RateSample, RateSampleId, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Feature-gated imports
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(feature = "sqlite"))]
use chrono::{DateTime, Utc};
#[cfg(not(feature = "sqlite"))]
use rust_decimal::Decimal;
#[cfg(not(feature = "sqlite"))]
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Rate sample row from database.
#[derive(FromRow)]
pub struct DbRateSample {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    pub pair: String,

    #[cfg(not(feature = "sqlite"))]
    pub rate: Decimal,
    #[cfg(feature = "sqlite")]
    pub rate: String,

    #[cfg(not(feature = "sqlite"))]
    pub timestamp: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub timestamp: String,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,
}

/// Rate-only row for aggregate queries.
#[derive(FromRow)]
pub struct DbRateValue {
    #[cfg(not(feature = "sqlite"))]
    pub rate: Decimal,
    #[cfg(feature = "sqlite")]
    pub rate: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_pair(s: &str) -> Result<CurrencyPair, RepoError> {
    s.parse::<CurrencyPair>()
        .map_err(|_| RepoError::Database(format!("Unknown pair in row: {}", s)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion (feature-gated implementations)
// ─────────────────────────────────────────────────────────────────────────────

impl DbRateSample {
    /// Convert database row to domain RateSample.
    pub fn into_domain(self) -> Result<RateSample, RepoError> {
        let pair = parse_pair(&self.pair)?;

        #[cfg(not(feature = "sqlite"))]
        let (id, rate, timestamp, created_at) = (
            RateSampleId::from_uuid(self.id),
            self.rate,
            self.timestamp,
            self.created_at,
        );

        #[cfg(feature = "sqlite")]
        let (id, rate, timestamp, created_at) = {
            let uuid =
                uuid::Uuid::parse_str(&self.id).map_err(|e| RepoError::Database(e.to_string()))?;

            let rate: rust_decimal::Decimal = self
                .rate
                .parse()
                .map_err(|e: rust_decimal::Error| RepoError::Database(e.to_string()))?;

            let timestamp = chrono::DateTime::parse_from_rfc3339(&self.timestamp)
                .map_err(|e| RepoError::Database(e.to_string()))?
                .with_timezone(&chrono::Utc);

            let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
                .map_err(|e| RepoError::Database(e.to_string()))?
                .with_timezone(&chrono::Utc);

            (RateSampleId::from_uuid(uuid), rate, timestamp, created_at)
        };

        Ok(RateSample::from_parts(id, pair, rate, timestamp, created_at))
    }
}

impl DbRateValue {
    /// Convert database row to a decimal rate.
    #[cfg(not(feature = "sqlite"))]
    pub fn into_rate(self) -> Result<rust_decimal::Decimal, RepoError> {
        Ok(self.rate)
    }

    /// Convert database row to a decimal rate.
    #[cfg(feature = "sqlite")]
    pub fn into_rate(self) -> Result<rust_decimal::Decimal, RepoError> {
        self.rate
            .parse()
            .map_err(|e: rust_decimal::Error| RepoError::Database(e.to_string()))
    }
}
