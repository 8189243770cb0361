//! Market data models
//!
//! - `types` - Type aliases for common identifiers (ProviderSymbol)
//! - `instrument` - Instruments to look up and their kind
//! - `bar` - Raw session data returned by a fetcher (Bar)
//! - `quote` - Normalized quote data (Quote, QuoteFields, FieldSet)

mod bar;
mod instrument;
mod quote;
mod types;

pub use bar::Bar;
pub use instrument::{Instrument, InstrumentKind};
pub use quote::{FieldSet, Quote, QuoteField, QuoteFields};
pub use types::ProviderSymbol;
