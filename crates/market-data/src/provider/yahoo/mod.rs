//! Yahoo Finance quote fetcher.
//!
//! Serves daily bars for every instrument kind the report covers:
//! - Equities/ETFs (e.g., SPY, QQQ)
//! - Cryptocurrencies (e.g., BTC-USD)
//! - Indices (e.g., 000001.SS)
//!
//! Two endpoints are available. `Chart` asks the chart API for the most
//! recent daily bar. `QuoteSummary` reads the `price` module snapshot and
//! needs the cookie/crumb handshake.

mod models;

use std::str::FromStr;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::header;
use rust_decimal::Decimal;
use tracing::debug;
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::Bar;
use crate::provider::{QuoteFetcher, SessionWindow};

use models::{YahooPriceData, YahooPriceDetail, YahooQuoteSummaryResponse};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Endpoint Selection
// ============================================================================

/// Yahoo API used to obtain the latest session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YahooEndpoint {
    /// Chart API, one daily bar per session
    #[default]
    Chart,
    /// quoteSummary `price` module snapshot of the current session
    QuoteSummary,
}

impl FromStr for YahooEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chart" => Ok(Self::Chart),
            "quote_summary" | "quotesummary" => Ok(Self::QuoteSummary),
            other => Err(format!("unknown Yahoo endpoint '{}'", other)),
        }
    }
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance quote fetcher.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
    endpoint: YahooEndpoint,
}

impl YahooProvider {
    /// Create a new Yahoo Finance fetcher using the given endpoint.
    pub fn new(endpoint: YahooEndpoint) -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;
        Ok(Self {
            connector,
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> YahooEndpoint {
        self.endpoint
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        let cached = YAHOO_CRUMB.read().ok().and_then(|guard| guard.clone());
        if let Some(crumb) = cached {
            return Ok(crumb);
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("Failed to get cookie: {}", e))
            })?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, "Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("Failed to get crumb: {}", e))
            })?
            .text()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("Failed to read crumb: {}", e))
            })?;

        let crumb_data = CrumbData { cookie, crumb };

        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = Some(crumb_data.clone());
        }

        Ok(crumb_data)
    }

    // ========================================================================
    // Bar Fetching
    // ========================================================================

    /// Fetch daily bars from the chart API.
    async fn fetch_chart_bars(
        &self,
        symbol: &str,
        window: SessionWindow,
    ) -> Result<Vec<Bar>, MarketDataError> {
        let response = match self
            .connector
            .get_quote_range(symbol, window.interval(), window.range())
            .await
        {
            Ok(response) => response,
            Err(e) => return chart_error_to_result(symbol, e),
        };

        match response.quotes() {
            Ok(yahoo_quotes) => chart_quotes_to_bars(&yahoo_quotes),
            Err(e) => chart_error_to_result(symbol, e),
        }
    }

    /// Build the current session bar from the quoteSummary `price` module.
    async fn fetch_summary_bars(&self, symbol: &str) -> Result<Vec<Bar>, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            clear_cached_crumb();
            return Err(MarketDataError::provider(
                PROVIDER_ID,
                "Yahoo authentication expired",
            ));
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to parse quoteSummary response: {}", e),
            )
        })?;

        summary_to_bars(symbol, data)
    }
}

// ============================================================================
// QuoteFetcher Implementation
// ============================================================================

#[async_trait]
impl QuoteFetcher for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        window: SessionWindow,
    ) -> Result<Vec<Bar>, MarketDataError> {
        debug!(
            "Fetching {} bars for {} from Yahoo ({:?})",
            window.range(),
            symbol,
            self.endpoint
        );

        match self.endpoint {
            YahooEndpoint::Chart => self.fetch_chart_bars(symbol, window).await,
            YahooEndpoint::QuoteSummary => self.fetch_summary_bars(symbol).await,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert an `f64` from Yahoo into a `Decimal` through its shortest
/// round-trip text, so `65432.105` stays `65432.105` instead of picking up
/// binary noise.
fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

/// Clear the cached crumb (used when authentication fails)
fn clear_cached_crumb() {
    if let Ok(mut guard) = YAHOO_CRUMB.write() {
        *guard = None;
    }
}

fn session_timestamp(seconds: i64) -> Result<DateTime<Utc>, MarketDataError> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| MarketDataError::validation(format!("Invalid timestamp: {}", seconds)))
}

fn required_price(value: f64, field: &str) -> Result<Decimal, MarketDataError> {
    decimal_from_f64(value).ok_or_else(|| {
        MarketDataError::validation(format!("Failed to convert {} {} to Decimal", field, value))
    })
}

/// Convert a chart API quote into a bar dated by its UTC calendar day.
fn yahoo_quote_to_bar(yahoo_quote: &yahoo::Quote) -> Result<Bar, MarketDataError> {
    let timestamp = session_timestamp(yahoo_quote.timestamp as i64)?;

    Ok(Bar {
        date: timestamp.date_naive(),
        open: required_price(yahoo_quote.open, "open")?,
        high: required_price(yahoo_quote.high, "high")?,
        low: required_price(yahoo_quote.low, "low")?,
        close: required_price(yahoo_quote.close, "close")?,
        volume: Decimal::from(yahoo_quote.volume),
    })
}

/// Map a chart API error. `NoQuotes` means the session has no bars.
fn chart_error_to_result(
    symbol: &str,
    error: yahoo::YahooError,
) -> Result<Vec<Bar>, MarketDataError> {
    match error {
        yahoo::YahooError::NoQuotes => {
            debug!("Yahoo chart returned no quotes for {}", symbol);
            Ok(vec![])
        }
        yahoo::YahooError::NoResult => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        e => Err(MarketDataError::provider(PROVIDER_ID, e.to_string())),
    }
}

/// Convert every chart quote. One bad quote fails the whole response so a
/// stale bar is never reported as the latest session.
fn chart_quotes_to_bars(yahoo_quotes: &[yahoo::Quote]) -> Result<Vec<Bar>, MarketDataError> {
    yahoo_quotes.iter().map(yahoo_quote_to_bar).collect()
}

/// Turn a quoteSummary envelope into at most one bar.
fn summary_to_bars(
    symbol: &str,
    response: YahooQuoteSummaryResponse,
) -> Result<Vec<Bar>, MarketDataError> {
    let summary = response.quote_summary;
    let Some(results) = summary.result else {
        return Err(match summary.error {
            Some(error) if error.code.as_deref() == Some("Not Found") => {
                MarketDataError::SymbolNotFound(symbol.to_string())
            }
            Some(error) => MarketDataError::provider(
                PROVIDER_ID,
                error
                    .description
                    .unwrap_or_else(|| "quoteSummary returned no result".to_string()),
            ),
            None => MarketDataError::SymbolNotFound(symbol.to_string()),
        });
    };

    match results.first().and_then(|r| r.price.as_ref()) {
        Some(price) => Ok(vec![price_to_bar(price)?]),
        None => {
            debug!("quoteSummary has no price module for {}", symbol);
            Ok(vec![])
        }
    }
}

/// Convert a quoteSummary price module into a bar.
///
/// Session time, open, high, low, price and volume must all be present.
fn price_to_bar(price: &YahooPriceData) -> Result<Bar, MarketDataError> {
    fn field(detail: &Option<YahooPriceDetail>, name: &str) -> Result<Decimal, MarketDataError> {
        detail
            .as_ref()
            .and_then(|p| p.raw)
            .and_then(decimal_from_f64)
            .ok_or_else(|| {
                MarketDataError::validation(format!("quoteSummary price has no valid {}", name))
            })
    }

    let seconds = price.regular_market_time.ok_or_else(|| {
        MarketDataError::validation("quoteSummary price has no regularMarketTime")
    })?;
    let timestamp = session_timestamp(seconds)?;

    Ok(Bar {
        date: timestamp.date_naive(),
        open: field(&price.regular_market_open, "regularMarketOpen")?,
        high: field(&price.regular_market_day_high, "regularMarketDayHigh")?,
        low: field(&price.regular_market_day_low, "regularMarketDayLow")?,
        close: field(&price.regular_market_price, "regularMarketPrice")?,
        volume: field(&price.regular_market_volume, "regularMarketVolume")?,
    })
}

// ============================================================================
// Tests
// ============================================================================
