use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::quote::FieldSet;
use super::types::ProviderSymbol;

/// Instrument classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentKind {
    /// Exchange-traded security or fund (SPY, QQQ)
    #[default]
    Equity,
    /// Market index (000001.SS)
    Index,
    /// Cryptocurrency pair (BTC-USD)
    Crypto,
}

impl InstrumentKind {
    /// The quote form reported for this kind of instrument.
    ///
    /// Crypto pairs only report a price; everything else reports full OHLCV.
    pub fn field_set(&self) -> FieldSet {
        match self {
            Self::Equity | Self::Index => FieldSet::Full,
            Self::Crypto => FieldSet::PriceOnly,
        }
    }
}

/// An instrument to look up, as understood by the quote fetcher.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Instrument {
    /// Symbol passed verbatim to the fetcher
    pub symbol: ProviderSymbol,
    pub kind: InstrumentKind,
}

impl Instrument {
    pub fn new(symbol: &str, kind: InstrumentKind) -> Self {
        Self {
            symbol: Arc::from(symbol),
            kind,
        }
    }

    pub fn equity(symbol: &str) -> Self {
        Self::new(symbol, InstrumentKind::Equity)
    }

    pub fn index(symbol: &str) -> Self {
        Self::new(symbol, InstrumentKind::Index)
    }

    pub fn crypto(symbol: &str) -> Self {
        Self::new(symbol, InstrumentKind::Crypto)
    }

    pub fn field_set(&self) -> FieldSet {
        self.kind.field_set()
    }
}
