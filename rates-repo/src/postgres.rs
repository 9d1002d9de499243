//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use rates_types::{CurrencyPair, RateRepository, RateSample, RateStatistics, RepoError};

use crate::types::{DbRateSample, DbRateValue};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_rate_samples_pg.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RateRepository for PostgresRepo {
    async fn save(&self, sample: &RateSample) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO rate_samples (id, pair, rate, "timestamp", created_at) VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(sample.id.into_uuid())
        .bind(sample.pair.code())
        .bind(sample.rate)
        .bind(sample.timestamp)
        .bind(sample.created_at)
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
                r#"INSERT INTO rate_samples (id, pair, rate, "timestamp", created_at) VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(sample.id.into_uuid())
            .bind(sample.pair.code())
            .bind(sample.rate)
            .bind(sample.timestamp)
            .bind(sample.created_at)
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
        let cutoff = Utc::now() - Duration::hours(24);

        let rows: Vec<DbRateSample> = sqlx::query_as(
            r#"SELECT id, pair, rate, "timestamp", created_at FROM rate_samples
               WHERE pair = $1 AND "timestamp" >= $2
               ORDER BY "timestamp" ASC"#,
        )
        .bind(pair.code())
        .bind(cutoff)
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
            r#"SELECT id, pair, rate, "timestamp", created_at FROM rate_samples
               WHERE pair = $1 AND "timestamp" >= $2 AND "timestamp" < $3
               ORDER BY "timestamp" ASC"#,
        )
        .bind(pair.code())
        .bind(start)
        .bind(end)
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
            r#"SELECT id, pair, rate, "timestamp", created_at FROM rate_samples
               WHERE pair = $1
               ORDER BY "timestamp" DESC
               LIMIT 1"#,
        )
        .bind(pair.code())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbRateSample::into_domain).transpose()
    }

    async fn cleanup_old_rates(&self, days_to_keep: u32) -> Result<u64, RepoError> {
        let cutoff = Utc::now() - Duration::days(i64::from(days_to_keep));

        let result = sqlx::query(r#"DELETE FROM rate_samples WHERE "timestamp" < $1"#)
            .bind(cutoff)
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
               WHERE pair = $1 AND "timestamp" >= $2 AND "timestamp" <= $3"#,
        )
        .bind(pair.code())
        .bind(from)
        .bind(to)
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
