//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use rates_types::domain::CurrencyPair;
use rates_types::dto::{
    DayResponse, ErrorBody, Last24HoursResponse, LatestAllResponse, LatestRate, PairsResponse,
    RatePoint, StatisticsResponse,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Supported currency pairs
#[utoipa::path(
    get,
    path = "/rates/pairs",
    tag = "rates",
    responses(
        (status = 200, description = "The closed pair set", body = PairsResponse)
    )
)]
async fn pairs() {}

/// Rates over the rolling last 24 hours
#[utoipa::path(
    get,
    path = "/rates/last-24h",
    tag = "rates",
    params(
        ("pair" = String, Query, description = "Currency pair, e.g. EUR/BTC")
    ),
    responses(
        (status = 200, description = "Samples in the window, ascending", body = Last24HoursResponse),
        (status = 400, description = "Missing or unsupported pair", body = ErrorBody)
    )
)]
async fn last_24_hours() {}

/// Rates on a single calendar day
#[utoipa::path(
    get,
    path = "/rates/day",
    tag = "rates",
    params(
        ("pair" = String, Query, description = "Currency pair, e.g. EUR/BTC"),
        ("date" = String, Query, description = "Calendar day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Samples on the day, ascending", body = DayResponse),
        (status = 400, description = "Validation failure or future date", body = ErrorBody)
    )
)]
async fn day() {}

/// Latest rate per pair
#[utoipa::path(
    get,
    path = "/rates/latest",
    tag = "rates",
    params(
        ("pair" = Option<String>, Query, description = "Optional pair; omitted returns every pair with data")
    ),
    responses(
        (status = 200, description = "Latest sample(s)", body = LatestAllResponse),
        (status = 400, description = "Unsupported pair", body = ErrorBody),
        (status = 404, description = "No data for the given pair", body = ErrorBody)
    )
)]
async fn latest() {}

/// Aggregate statistics over a time range
#[utoipa::path(
    get,
    path = "/rates/statistics",
    tag = "rates",
    params(
        ("pair" = String, Query, description = "Currency pair, e.g. EUR/BTC"),
        ("from" = String, Query, description = "Range start, RFC3339"),
        ("to" = String, Query, description = "Range end, RFC3339, inclusive")
    ),
    responses(
        (status = 200, description = "count/min/max/avg over the range", body = StatisticsResponse),
        (status = 400, description = "Validation failure", body = ErrorBody)
    )
)]
async fn statistics() {}

/// OpenAPI documentation for the Rates API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "EUR Crypto Rates API",
        version = "1.0.0",
        description = "Historical EUR/BTC, EUR/ETH and EUR/LTC exchange rates sampled from an upstream price feed.",
    ),
    paths(
        health,
        pairs,
        last_24_hours,
        day,
        latest,
        statistics,
    ),
    components(
        schemas(
            CurrencyPair,
            RatePoint,
            Last24HoursResponse,
            DayResponse,
            LatestRate,
            LatestAllResponse,
            PairsResponse,
            StatisticsResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Rate query operations"),
    )
)]
pub struct ApiDoc;
