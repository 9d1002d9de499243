//! # Rates Hex
//!
//! Application service layer, ingestion runner, and HTTP adapter for the
//! rates service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates store reads)
//! - `ingest/` - Ingestion runner (feed -> store write path)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! Service and runner are generic over the `RateRepository` / `RateFeed`
//! ports, allowing different adapter implementations to be injected.

pub mod inbound;
pub mod ingest;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use ingest::{IngestError, IngestOptions, IngestReport, IngestRunner};
pub use service::RateService;
