//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Deserialize;
use utoipa::OpenApi;

use rates_types::{
    AppError, CurrencyPair, DayResponse, ErrorBody, Last24HoursResponse, LatestAllResponse,
    LatestRate, PairsResponse, RateRepository, StatisticsResponse,
};

use crate::RateService;

/// Application state shared across handlers.
pub struct AppState<R: RateRepository> {
    pub service: RateService<R>,
}

/// Wraps an [`AppError`] with the request path so every non-2xx response
/// renders the uniform envelope.
pub struct ApiError {
    error: AppError,
    path: String,
}

impl ApiError {
    pub fn new(error: AppError, path: &str) -> Self {
        Self {
            error,
            path: path.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, category) = match &self.error {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            AppError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "Invalid date"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };

        let message = match &self.error {
            AppError::Internal(detail) => {
                tracing::error!(path = %self.path, error = %detail, "request failed");
                if cfg!(debug_assertions) {
                    detail.clone()
                } else {
                    "Internal server error".to_string()
                }
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: category.to_string(),
            message,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            path: self.path,
        };

        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query parameters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub pair: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub pair: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub pair: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

fn require_pair(raw: Option<&str>) -> Result<CurrencyPair, AppError> {
    let raw = raw.ok_or_else(|| {
        AppError::Validation("missing required query parameter `pair`".into())
    })?;
    raw.parse()
        .map_err(|_| AppError::Validation(format!("unsupported pair `{}`", raw)))
}

fn require_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    let raw = raw.ok_or_else(|| {
        AppError::Validation("missing required query parameter `date`".into())
    })?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("date must match YYYY-MM-DD, got `{}`", raw)))
}

fn require_datetime(name: &str, raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.ok_or_else(|| {
        AppError::Validation(format!("missing required query parameter `{}`", name))
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AppError::Validation(format!("`{}` must be an RFC3339 timestamp, got `{}`", name, raw))
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Serves the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(crate::openapi::ApiDoc::openapi())
}

/// Static echo of the supported pair set.
pub async fn pairs() -> impl IntoResponse {
    Json(PairsResponse::current())
}

/// Samples over the rolling last 24 hours for one pair.
#[tracing::instrument(skip(state))]
pub async fn last_24_hours<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PairQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path();

    let pair = require_pair(query.pair.as_deref()).map_err(|e| ApiError::new(e, path))?;
    let samples = state
        .service
        .last_24_hours(pair)
        .await
        .map_err(|e| ApiError::new(e, path))?;

    Ok(Json(Last24HoursResponse::new(pair, &samples)))
}

/// Samples on one calendar day for one pair.
#[tracing::instrument(skip(state))]
pub async fn day<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path();

    let pair = require_pair(query.pair.as_deref()).map_err(|e| ApiError::new(e, path))?;
    let date = require_date(query.date.as_deref()).map_err(|e| ApiError::new(e, path))?;
    let samples = state
        .service
        .by_day(pair, date)
        .await
        .map_err(|e| ApiError::new(e, path))?;

    Ok(Json(DayResponse::new(pair, date, &samples)))
}

/// Latest sample for one pair, or for every pair with data.
#[tracing::instrument(skip(state))]
pub async fn latest<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PairQuery>,
) -> Result<Response, ApiError> {
    let path = uri.path();

    match query.pair.as_deref() {
        Some(raw) => {
            let pair = require_pair(Some(raw)).map_err(|e| ApiError::new(e, path))?;
            let sample = state
                .service
                .latest(pair)
                .await
                .map_err(|e| ApiError::new(e, path))?;

            Ok(Json(LatestRate::from_sample(&sample)).into_response())
        }
        None => {
            let samples = state
                .service
                .latest_all()
                .await
                .map_err(|e| ApiError::new(e, path))?;

            let rates: Vec<LatestRate> = samples.iter().map(LatestRate::from_sample).collect();
            let count = rates.len();

            Ok(Json(LatestAllResponse { rates, count }).into_response())
        }
    }
}

/// Aggregate statistics for one pair over an inclusive time range.
#[tracing::instrument(skip(state))]
pub async fn statistics<R: RateRepository>(
    State(state): State<Arc<AppState<R>>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let path = uri.path();

    let pair = require_pair(query.pair.as_deref()).map_err(|e| ApiError::new(e, path))?;
    let from = require_datetime("from", query.from.as_deref()).map_err(|e| ApiError::new(e, path))?;
    let to = require_datetime("to", query.to.as_deref()).map_err(|e| ApiError::new(e, path))?;

    let stats = state
        .service
        .statistics(pair, from, to)
        .await
        .map_err(|e| ApiError::new(e, path))?;

    Ok(Json(StatisticsResponse::new(
        pair,
        from.to_rfc3339_opts(SecondsFormat::Secs, true),
        to.to_rfc3339_opts(SecondsFormat::Secs, true),
        &stats,
    )))
}
