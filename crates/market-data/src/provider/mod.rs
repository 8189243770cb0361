//! Quote fetcher abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteFetcher` trait that all bar sources implement
//! - The `SessionWindow` requested from a fetcher
//! - The Yahoo Finance implementation
//!
//! Fetchers only return raw bars. Selecting the latest bar, rounding and
//! failure handling belong to the normalizer, not to the fetchers.

mod traits;

pub mod yahoo;

// Re-exports
pub use traits::{QuoteFetcher, SessionWindow};
