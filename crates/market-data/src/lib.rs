//! Marketbrief Market Data Crate
//!
//! This crate fetches the most recent trading session for an instrument
//! and normalizes it into a display-ready quote.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |   QuoteFetcher   | --> |  QuoteNormalizer | --> |  Quote / None    |
//! | (Yahoo, doubles) |     | latest bar, round|     |  (best effort)   |
//! +------------------+     +------------------+     +------------------+
//!          |                        |
//!          v                        v
//!      Vec<Bar>             NormalizeOutcome
//! ```
//!
//! # Core Types
//!
//! - [`Bar`] - Raw session data as returned by a fetcher
//! - [`Quote`] - Normalized quote, either full OHLCV or price only
//! - [`FieldSet`] - Selects the quote form
//! - [`Instrument`] - Symbol plus kind, which implies the field set
//! - [`QuoteFetcher`] - Injected source of bars
//! - [`QuoteNormalizer`] - Fetch, select, validate and round
//!
//! Prices are rounded half away from zero to two decimal places.
//! Volume is truncated, never rounded.

pub mod errors;
pub mod models;
pub mod normalizer;
pub mod provider;

pub use errors::MarketDataError;

// Re-export all public types from models
pub use models::{
    Bar, FieldSet, Instrument, InstrumentKind, ProviderSymbol, Quote, QuoteField, QuoteFields,
};

// Re-export normalizer types
pub use normalizer::{
    normalize_bar, normalize_bars, round_price, truncate_volume, NormalizeOutcome,
    QuoteNormalizer, PRICE_DECIMALS,
};

// Re-export provider types
pub use provider::yahoo::{YahooEndpoint, YahooProvider};
pub use provider::{QuoteFetcher, SessionWindow};
