//! RateService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use rates_types::{
        AppError, CurrencyPair, RateRepository, RateSample, RateSampleId, RateStatistics,
        RepoError,
    };

    use crate::RateService;

    /// Simple in-memory repository for testing the service and the runner.
    pub struct MockRepo {
        samples: Mutex<Vec<RateSample>>,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                samples: Mutex::new(Vec::new()),
            }
        }

        pub fn stored(&self) -> Vec<RateSample> {
            self.samples.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RateRepository for MockRepo {
        async fn save(&self, sample: &RateSample) -> Result<(), RepoError> {
            self.samples.lock().unwrap().push(sample.clone());
            Ok(())
        }

        async fn save_all(&self, samples: &[RateSample]) -> Result<(), RepoError> {
            self.samples.lock().unwrap().extend_from_slice(samples);
            Ok(())
        }

        async fn find_last_24_hours(
            &self,
            pair: CurrencyPair,
        ) -> Result<Vec<RateSample>, RepoError> {
            let cutoff = Utc::now() - Duration::hours(24);
            let mut found: Vec<RateSample> = self
                .samples
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.pair == pair && s.timestamp >= cutoff)
                .cloned()
                .collect();
            found.sort_by_key(|s| s.timestamp);
            Ok(found)
        }

        async fn find_by_day(
            &self,
            pair: CurrencyPair,
            date: NaiveDate,
        ) -> Result<Vec<RateSample>, RepoError> {
            let start = date.and_time(NaiveTime::MIN).and_utc();
            let end = start + Duration::days(1);
            let mut found: Vec<RateSample> = self
                .samples
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.pair == pair && s.timestamp >= start && s.timestamp < end)
                .cloned()
                .collect();
            found.sort_by_key(|s| s.timestamp);
            Ok(found)
        }

        async fn find_latest_by_pair(
            &self,
            pair: CurrencyPair,
        ) -> Result<Option<RateSample>, RepoError> {
            Ok(self
                .samples
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.pair == pair)
                .max_by_key(|s| s.timestamp)
                .cloned())
        }

        async fn cleanup_old_rates(&self, days_to_keep: u32) -> Result<u64, RepoError> {
            let cutoff = Utc::now() - Duration::days(i64::from(days_to_keep));
            let mut samples = self.samples.lock().unwrap();
            let before = samples.len();
            samples.retain(|s| s.timestamp >= cutoff);
            Ok((before - samples.len()) as u64)
        }

        async fn statistics(
            &self,
            pair: CurrencyPair,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> Result<RateStatistics, RepoError> {
            let rates: Vec<Decimal> = self
                .samples
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.pair == pair && s.timestamp >= from && s.timestamp <= to)
                .map(|s| s.rate)
                .collect();
            Ok(RateStatistics::from_rates(&rates))
        }
    }

    pub fn sample_at(
        pair: CurrencyPair,
        rate: Decimal,
        timestamp: DateTime<Utc>,
    ) -> RateSample {
        RateSample::from_parts(RateSampleId::new(), pair, rate, timestamp, timestamp)
    }

    #[tokio::test]
    async fn test_by_day_rejects_future_date() {
        let service = RateService::new(MockRepo::new());
        let tomorrow = Utc::now().date_naive() + Duration::days(1);

        let err = service
            .by_day(CurrencyPair::EurBtc, tomorrow)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidDate(_)));
        assert!(err.to_string().contains("cannot be in the future"));
    }

    #[tokio::test]
    async fn test_by_day_allows_today() {
        let service = RateService::new(MockRepo::new());
        let today = Utc::now().date_naive();

        let samples = service.by_day(CurrencyPair::EurBtc, today).await.unwrap();

        assert!(samples.is_empty());
    }

    #[tokio::test]
    async fn test_latest_not_found_when_no_rows() {
        let service = RateService::new(MockRepo::new());

        let result = service.latest(CurrencyPair::EurBtc).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_latest_returns_most_recent() {
        let repo = MockRepo::new();
        let now = Utc::now();
        repo.save(&sample_at(
            CurrencyPair::EurBtc,
            dec!(0.1),
            now - Duration::hours(2),
        ))
        .await
        .unwrap();
        repo.save(&sample_at(CurrencyPair::EurBtc, dec!(0.2), now))
            .await
            .unwrap();

        let service = RateService::new(repo);
        let latest = service.latest(CurrencyPair::EurBtc).await.unwrap();

        assert_eq!(latest.rate, dec!(0.2));
    }

    #[tokio::test]
    async fn test_latest_all_omits_pairs_without_rows() {
        let repo = MockRepo::new();
        let now = Utc::now();
        repo.save(&sample_at(CurrencyPair::EurBtc, dec!(0.1), now))
            .await
            .unwrap();
        repo.save(&sample_at(CurrencyPair::EurLtc, dec!(0.3), now))
            .await
            .unwrap();

        let service = RateService::new(repo);
        let latest = service.latest_all().await.unwrap();

        let pairs: Vec<CurrencyPair> = latest.iter().map(|s| s.pair).collect();
        assert_eq!(pairs, vec![CurrencyPair::EurBtc, CurrencyPair::EurLtc]);
    }

    #[tokio::test]
    async fn test_statistics_rejects_inverted_range() {
        let service = RateService::new(MockRepo::new());
        let now = Utc::now();

        let result = service
            .statistics(CurrencyPair::EurBtc, now, now - Duration::hours(1))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cleanup_rejects_zero_retention() {
        let service = RateService::new(MockRepo::new());

        let result = service.cleanup(0).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cleanup_reports_deleted_count() {
        let repo = MockRepo::new();
        let now = Utc::now();
        repo.save(&sample_at(
            CurrencyPair::EurBtc,
            dec!(0.1),
            now - Duration::days(45),
        ))
        .await
        .unwrap();
        repo.save(&sample_at(CurrencyPair::EurBtc, dec!(0.2), now))
            .await
            .unwrap();

        let service = RateService::new(repo);
        let deleted = service.cleanup(30).await.unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(service.repo().stored().len(), 1);
    }
}
