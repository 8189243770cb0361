//! Quote fetcher trait definitions.
//!
//! This module defines the `QuoteFetcher` trait that every source of
//! session bars implements, and the `SessionWindow` it is asked for.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::Bar;

/// Window of sessions requested from a fetcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionWindow {
    /// The latest trading session only.
    #[default]
    MostRecentSession,
}

impl SessionWindow {
    /// Provider range string for this window.
    pub fn range(&self) -> &'static str {
        match self {
            Self::MostRecentSession => "1d",
        }
    }

    /// Provider bar interval for this window.
    pub fn interval(&self) -> &'static str {
        match self {
            Self::MostRecentSession => "1d",
        }
    }
}

/// Source of daily bars for a symbol.
///
/// Implement this trait to plug in a market data source. The normalizer
/// receives it as an injected dependency, so tests can substitute a
/// fetcher that returns canned bars.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use marketbrief_market_data::provider::{QuoteFetcher, SessionWindow};
///
/// struct CannedFetcher {
///     bars: Vec<Bar>,
/// }
///
/// #[async_trait]
/// impl QuoteFetcher for CannedFetcher {
///     fn id(&self) -> &'static str {
///         "CANNED"
///     }
///
///     async fn fetch_bars(
///         &self,
///         _symbol: &str,
///         _window: SessionWindow,
///     ) -> Result<Vec<Bar>, MarketDataError> {
///         Ok(self.bars.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Unique identifier for this fetcher.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and in
    /// timeout errors.
    fn id(&self) -> &'static str;

    /// Fetch the bars for `symbol` within `window`.
    ///
    /// # Returns
    ///
    /// Bars ordered by date ascending, so the last element is the latest
    /// session. An empty vector means the symbol had no session in the
    /// window. Transport and lookup failures are returned as errors.
    async fn fetch_bars(
        &self,
        symbol: &str,
        window: SessionWindow,
    ) -> Result<Vec<Bar>, MarketDataError>;
}
