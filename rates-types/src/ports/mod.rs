//! Port traits implemented by adapters.

mod feed;
mod repository;

pub use feed::{RateBatch, RateFeed};
pub use repository::RateRepository;
