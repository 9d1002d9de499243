//! SQLite repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use rates_types::{CurrencyPair, RateRepository, RateSample, RateStatistics, RepoError};

use crate::types::{DbRateSample, DbRateValue};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file
        let ddl = include_str!("../migrations/0001_create_rate_samples.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RateRepository for SqliteRepo {
    async fn save(&self, sample: &RateSample) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO rate_samples (id, pair, rate, timestamp, created_at) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(sample.id.to_string())
        .bind(sample.pair.code())
        .bind(sample.rate.to_string())
        .bind(sample.timestamp.to_rfc3339())
        .bind(sample.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn save_all(&self, samples: &[RateSample]) -> Result<(), RepoError> {
        if samples.is_empty() {
            return Ok(());
        }

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        for sample in samples {
            sqlx::query(
                r#"INSERT INTO rate_samples (id, pair, rate, timestamp, created_at) VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(sample.id.to_string())
            .bind(sample.pair.code())
            .bind(sample.rate.to_string())
            .bind(sample.timestamp.to_rfc3339())
            .bind(sample.created_at.to_rfc3339())
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        }

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(())
    }

    async fn find_last_24_hours(
        &self,
        pair: CurrencyPair,
    ) -> Result<Vec<RateSample>, RepoError> {
        let cutoff = (Utc::now() - Duration::hours(24)).to_rfc3339();

        let rows: Vec<DbRateSample> = sqlx::query_as(
            r#"SELECT id, pair, rate, timestamp, created_at FROM rate_samples
               WHERE pair = ? AND timestamp >= ?
               ORDER BY timestamp ASC"#,
        )
        .bind(pair.code())
        .bind(&cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbRateSample::into_domain).collect()
    }

    async fn find_by_day(
        &self,
        pair: CurrencyPair,
        date: NaiveDate,
    ) -> Result<Vec<RateSample>, RepoError> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);

        let rows: Vec<DbRateSample> = sqlx::query_as(
            r#"SELECT id, pair, rate, timestamp, created_at FROM rate_samples
               WHERE pair = ? AND timestamp >= ? AND timestamp < ?
               ORDER BY timestamp ASC"#,
        )
        .bind(pair.code())
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbRateSample::into_domain).collect()
    }

    async fn find_latest_by_pair(
        &self,
        pair: CurrencyPair,
    ) -> Result<Option<RateSample>, RepoError> {
        let row: Option<DbRateSample> = sqlx::query_as(
            r#"SELECT id, pair, rate, timestamp, created_at FROM rate_samples
               WHERE pair = ?
               ORDER BY timestamp DESC
               LIMIT 1"#,
        )
        .bind(pair.code())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbRateSample::into_domain).transpose()
    }

    async fn cleanup_old_rates(&self, days_to_keep: u32) -> Result<u64, RepoError> {
        let cutoff = (Utc::now() - Duration::days(i64::from(days_to_keep))).to_rfc3339();

        let result = sqlx::query(r#"DELETE FROM rate_samples WHERE timestamp < ?"#)
            .bind(&cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn statistics(
        &self,
        pair: CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<RateStatistics, RepoError> {
        let rows: Vec<DbRateValue> = sqlx::query_as(
            r#"SELECT rate FROM rate_samples
               WHERE pair = ? AND timestamp >= ? AND timestamp <= ?"#,
        )
        .bind(pair.code())
        .bind(from.to_rfc3339())
        .bind(to.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        // Aggregation runs on Decimal so min/max/avg stay exact.
        let rates = rows
            .into_iter()
            .map(DbRateValue::into_rate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RateStatistics::from_rates(&rates))
    }
}
