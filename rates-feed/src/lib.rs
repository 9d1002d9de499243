//! # Rates Feed
//!
//! Binance HTTP adapter for the [`RateFeed`] port.
//!
//! The upstream quotes crypto priced in EUR (`BTCEUR`); this service quotes
//! EUR priced in crypto, so every fetched price is inverted before it leaves
//! the adapter. The inversion is computed on `Decimal`, never on floats.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;

use rates_types::{CurrencyPair, FeedError, PairFailure, RateBatch, RateFeed};

/// Public Binance REST base.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com/api/v3";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const PING_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = concat!("eur-rates/", env!("CARGO_PKG_VERSION"));

/// Binance price feed adapter.
pub struct BinanceFeed {
    http: Client,
    base_url: String,
}

impl BinanceFeed {
    /// Creates a new feed client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build upstream HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Parses the upstream `{"price": "<decimal string>"}` body.
    fn parse_price(body: &str) -> Result<Decimal, FeedError> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|_| FeedError::InvalidResponseFormat)?;

        let price_str = value
            .get("price")
            .and_then(serde_json::Value::as_str)
            .ok_or(FeedError::InvalidResponseFormat)?;

        let price: Decimal = price_str
            .parse()
            .map_err(|_| FeedError::InvalidResponseFormat)?;

        if price <= Decimal::ZERO {
            return Err(FeedError::InvalidPrice(price));
        }

        Ok(price)
    }
}

#[async_trait]
impl RateFeed for BinanceFeed {
    async fn fetch_rate(&self, pair: CurrencyPair) -> Result<Decimal, FeedError> {
        let symbol = pair.upstream_symbol();

        let response = self
            .http
            .get(format!("{}/price", self.base_url))
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FeedError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let price = Self::parse_price(&body)?;

        // Upstream quotes crypto in EUR; we quote EUR in crypto.
        Ok(Decimal::ONE / price)
    }

    async fn fetch_all_rates(&self) -> Result<RateBatch, FeedError> {
        let mut batch = RateBatch::default();

        for pair in CurrencyPair::all() {
            match self.fetch_rate(*pair).await {
                Ok(rate) => batch.rates.push((*pair, rate)),
                Err(err) => {
                    tracing::warn!(pair = %pair, error = %err, "failed to fetch rate");
                    batch.failures.push(PairFailure {
                        pair: *pair,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if batch.rates.is_empty() {
            return Err(FeedError::AllRatesFailed(batch.failures));
        }

        Ok(batch)
    }

    async fn is_available(&self) -> bool {
        let response = self
            .http
            .get(format!("{}/ping", self.base_url))
            .timeout(PING_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(err) => {
                tracing::debug!(error = %err, "upstream ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed(server: &MockServer) -> BinanceFeed {
        BinanceFeed::new(server.uri()).unwrap()
    }

    async fn mount_price(server: &MockServer, symbol: &str, price: &str) {
        Mock::given(method("GET"))
            .and(path("/price"))
            .and(query_param("symbol", symbol))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "symbol": symbol, "price": price })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_rate_inverts_upstream_price() {
        let server = MockServer::start().await;
        mount_price(&server, "BTCEUR", "20000").await;

        let rate = feed(&server)
            .fetch_rate(CurrencyPair::EurBtc)
            .await
            .unwrap();

        assert_eq!(rate, dec!(0.00005));
    }

    #[tokio::test]
    async fn test_inversion_law_for_non_terminating_quotient() {
        let server = MockServer::start().await;
        mount_price(&server, "ETHEUR", "3000.50").await;

        let rate = feed(&server)
            .fetch_rate(CurrencyPair::EurEth)
            .await
            .unwrap();

        let expected = 1.0 / 3000.50;
        assert!((rate.to_f64().unwrap() - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fetch_rate_zero_price_is_invalid() {
        let server = MockServer::start().await;
        mount_price(&server, "BTCEUR", "0").await;

        let result = feed(&server).fetch_rate(CurrencyPair::EurBtc).await;
        assert!(matches!(result, Err(FeedError::InvalidPrice(_))));
    }

    #[tokio::test]
    async fn test_fetch_rate_negative_price_is_invalid() {
        let server = MockServer::start().await;
        mount_price(&server, "LTCEUR", "-42.5").await;

        let result = feed(&server).fetch_rate(CurrencyPair::EurLtc).await;
        assert!(matches!(result, Err(FeedError::InvalidPrice(_))));
    }

    #[tokio::test]
    async fn test_fetch_rate_missing_price_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "symbol": "BTCEUR" })),
            )
            .mount(&server)
            .await;

        let result = feed(&server).fetch_rate(CurrencyPair::EurBtc).await;
        assert!(matches!(result, Err(FeedError::InvalidResponseFormat)));
    }

    #[tokio::test]
    async fn test_fetch_rate_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let result = feed(&server).fetch_rate(CurrencyPair::EurBtc).await;
        assert!(matches!(result, Err(FeedError::InvalidResponseFormat)));
    }

    #[tokio::test]
    async fn test_fetch_rate_upstream_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let result = feed(&server).fetch_rate(CurrencyPair::EurBtc).await;
        match result {
            Err(FeedError::Upstream { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rate_network_error() {
        // Nothing listens on this port.
        let feed = BinanceFeed::new("http://127.0.0.1:9").unwrap();

        let result = feed.fetch_rate(CurrencyPair::EurBtc).await;
        assert!(matches!(result, Err(FeedError::Network(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_rates_all_succeed() {
        let server = MockServer::start().await;
        mount_price(&server, "BTCEUR", "20000").await;
        mount_price(&server, "ETHEUR", "1600").await;
        mount_price(&server, "LTCEUR", "80").await;

        let batch = feed(&server).fetch_all_rates().await.unwrap();

        assert_eq!(batch.rates.len(), 3);
        assert!(batch.failures.is_empty());
        assert_eq!(batch.rates[0], (CurrencyPair::EurBtc, dec!(0.00005)));
        assert_eq!(batch.rates[1], (CurrencyPair::EurEth, dec!(0.000625)));
        assert_eq!(batch.rates[2], (CurrencyPair::EurLtc, dec!(0.0125)));
    }

    #[tokio::test]
    async fn test_fetch_all_rates_partial_failure_keeps_successes() {
        let server = MockServer::start().await;
        mount_price(&server, "BTCEUR", "20000").await;
        mount_price(&server, "ETHEUR", "1600").await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .and(query_param("symbol", "LTCEUR"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let batch = feed(&server).fetch_all_rates().await.unwrap();

        assert_eq!(batch.rates.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].pair, CurrencyPair::EurLtc);
    }

    #[tokio::test]
    async fn test_fetch_all_rates_all_fail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let result = feed(&server).fetch_all_rates().await;
        match result {
            Err(FeedError::AllRatesFailed(failures)) => {
                assert_eq!(failures.len(), 3);
            }
            other => panic!("expected AllRatesFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_is_available_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(feed(&server).is_available().await);
    }

    #[tokio::test]
    async fn test_is_available_false_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!feed(&server).is_available().await);
    }

    #[tokio::test]
    async fn test_is_available_false_when_unreachable() {
        let feed = BinanceFeed::new("http://127.0.0.1:9").unwrap();
        assert!(!feed.is_available().await);
    }
}
