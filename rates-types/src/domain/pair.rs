//! The closed set of quoted currency pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::DomainError;

/// A currency pair quoted by this service: EUR priced in a crypto currency.
///
/// The set is closed. Membership and the upstream symbol mapping live here,
/// so every boundary (query parameter, CLI argument, persisted row) goes
/// through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CurrencyPair {
    #[serde(rename = "EUR/BTC")]
    EurBtc,
    #[serde(rename = "EUR/ETH")]
    EurEth,
    #[serde(rename = "EUR/LTC")]
    EurLtc,
}

impl CurrencyPair {
    /// All supported pairs, in stable declaration order.
    pub fn all() -> &'static [CurrencyPair] {
        &[
            CurrencyPair::EurBtc,
            CurrencyPair::EurEth,
            CurrencyPair::EurLtc,
        ]
    }

    /// Canonical pair code, e.g. `EUR/BTC`.
    pub fn code(&self) -> &'static str {
        match self {
            CurrencyPair::EurBtc => "EUR/BTC",
            CurrencyPair::EurEth => "EUR/ETH",
            CurrencyPair::EurLtc => "EUR/LTC",
        }
    }

    /// The symbol the upstream feed quotes this pair under.
    ///
    /// The upstream quotes crypto priced in EUR, so the symbol order is
    /// reversed relative to our pair code.
    pub fn upstream_symbol(&self) -> &'static str {
        match self {
            CurrencyPair::EurBtc => "BTCEUR",
            CurrencyPair::EurEth => "ETHEUR",
            CurrencyPair::EurLtc => "LTCEUR",
        }
    }

    /// Base currency (always EUR).
    pub fn base(&self) -> &'static str {
        "EUR"
    }

    /// Quote currency, e.g. BTC.
    pub fn quote(&self) -> &'static str {
        match self {
            CurrencyPair::EurBtc => "BTC",
            CurrencyPair::EurEth => "ETH",
            CurrencyPair::EurLtc => "LTC",
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for CurrencyPair {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EUR/BTC" => Ok(CurrencyPair::EurBtc),
            "EUR/ETH" => Ok(CurrencyPair::EurEth),
            "EUR/LTC" => Ok(CurrencyPair::EurLtc),
            _ => Err(DomainError::UnsupportedPair(s.to_string())),
        }
    }
}
