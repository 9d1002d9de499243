//! Error types for the rates service.

use rust_decimal::Decimal;

use crate::domain::CurrencyPair;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Unsupported pair: {0}")]
    UnsupportedPair(String),

    #[error("Rate must be strictly positive, got {0}")]
    NonPositiveRate(Decimal),
}

/// A single pair's failure inside a multi-pair fetch.
#[derive(Debug, Clone)]
pub struct PairFailure {
    pub pair: CurrencyPair,
    pub reason: String,
}

impl std::fmt::Display for PairFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.pair, self.reason)
    }
}

/// Upstream feed adapter errors.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Upstream response is missing or has a malformed price field")]
    InvalidResponseFormat,

    #[error("Upstream returned a non-positive price: {0}")]
    InvalidPrice(Decimal),

    #[error("Network error talking to upstream: {0}")]
    Network(String),

    #[error("Upstream error: status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("All {} supported pairs failed to fetch", .0.len())]
    AllRatesFailed(Vec<PairFailure>),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Date {0} cannot be in the future")]
    InvalidDate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(DomainError::UnsupportedPair(p)) => {
                AppError::Validation(format!("Unsupported pair: {}", p))
            }
            RepoError::Domain(e) => AppError::Validation(e.to_string()),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Transaction(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_maps_to_app_error() {
        let err: AppError = RepoError::Database("boom".into()).into();
        assert!(matches!(err, AppError::Internal(_)));

        let err: AppError = RepoError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError =
            RepoError::Domain(DomainError::UnsupportedPair("EUR/XRP".into())).into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_invalid_date_message() {
        let err = AppError::InvalidDate("2099-01-01".into());
        assert!(err.to_string().contains("cannot be in the future"));
    }
}
