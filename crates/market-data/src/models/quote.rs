use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Selects which fields a normalized quote carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldSet {
    /// Open, high, low, close and volume
    Full,
    /// Close price only
    PriceOnly,
}

/// A labeled field of a normalized quote, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl QuoteField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }
}

/// Normalized values of a quote. Prices are already rounded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteFields {
    Full {
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    },
    PriceOnly {
        close: Decimal,
    },
}

/// Display-ready record derived from the latest bar of a symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Trading date of the session the quote was derived from
    pub date: NaiveDate,

    #[serde(flatten)]
    pub fields: QuoteFields,
}

impl Quote {
    /// Create a full OHLCV quote
    pub fn full(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            date,
            fields: QuoteFields::Full {
                open,
                high,
                low,
                close,
                volume,
            },
        }
    }

    /// Create a price-only quote
    pub fn price_only(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            fields: QuoteFields::PriceOnly { close },
        }
    }

    /// Trading date as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn field_set(&self) -> FieldSet {
        match self.fields {
            QuoteFields::Full { .. } => FieldSet::Full,
            QuoteFields::PriceOnly { .. } => FieldSet::PriceOnly,
        }
    }

    pub fn close(&self) -> Decimal {
        match self.fields {
            QuoteFields::Full { close, .. } | QuoteFields::PriceOnly { close } => close,
        }
    }

    /// Labeled values in display order.
    pub fn labeled_values(&self) -> Vec<(QuoteField, String)> {
        match &self.fields {
            QuoteFields::Full {
                open,
                high,
                low,
                close,
                volume,
            } => vec![
                (QuoteField::Open, open.to_string()),
                (QuoteField::High, high.to_string()),
                (QuoteField::Low, low.to_string()),
                (QuoteField::Close, close.to_string()),
                (QuoteField::Volume, volume.to_string()),
            ],
            QuoteFields::PriceOnly { close } => vec![(QuoteField::Close, close.to_string())],
        }
    }
}
