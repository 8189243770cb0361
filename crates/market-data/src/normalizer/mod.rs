//! Quote normalization.
//!
//! Turns one symbol's raw fetcher response into a display-ready [`Quote`].
//! The latest bar is selected, its prices are rounded half away from zero
//! to two decimal places and its volume is truncated to an integer.
//!
//! Two entry points are exposed:
//! - [`QuoteNormalizer::try_normalize`] returns a typed [`NormalizeOutcome`]
//!   and has no side effects beyond the fetch.
//! - [`QuoteNormalizer::normalize`] is the best-effort boundary. It never
//!   fails; every empty or failed lookup is logged once as a warning naming
//!   the symbol and collapses to `None`.

use std::sync::Arc;
use std::time::Duration;

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{Bar, FieldSet, Instrument, Quote};
use crate::provider::{QuoteFetcher, SessionWindow};

/// Decimal places every normalized price carries.
pub const PRICE_DECIMALS: u32 = 2;

/// Result of normalizing one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NormalizeOutcome {
    Success(Quote),
    /// The fetcher returned no bars for the session window.
    EmptyResult,
    /// The fetch failed or the latest bar could not be normalized.
    FetchFailure(String),
}

impl NormalizeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Collapse into the best-effort form: a quote or nothing.
    pub fn into_quote(self) -> Option<Quote> {
        match self {
            Self::Success(quote) => Some(quote),
            Self::EmptyResult | Self::FetchFailure(_) => None,
        }
    }
}

/// Round a price half away from zero and pin it to two decimal places.
pub fn round_price(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_DECIMALS);
    rounded
}

/// Truncate a raw volume towards zero.
pub fn truncate_volume(value: Decimal) -> Result<u64, MarketDataError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MarketDataError::validation(format!("Negative volume {}", value)));
    }
    value
        .trunc()
        .to_u64()
        .ok_or_else(|| MarketDataError::validation(format!("Volume {} out of range", value)))
}

/// Normalize a single bar into the requested quote form.
pub fn normalize_bar(bar: &Bar, field_set: FieldSet) -> Result<Quote, MarketDataError> {
    match field_set {
        FieldSet::Full => Ok(Quote::full(
            bar.date,
            round_price(bar.open),
            round_price(bar.high),
            round_price(bar.low),
            round_price(bar.close),
            truncate_volume(bar.volume)?,
        )),
        FieldSet::PriceOnly => Ok(Quote::price_only(bar.date, round_price(bar.close))),
    }
}

/// Normalize the latest of a date-ordered bar collection.
///
/// Returns `Ok(None)` when there are no bars.
pub fn normalize_bars(
    bars: &[Bar],
    field_set: FieldSet,
) -> Result<Option<Quote>, MarketDataError> {
    match bars.last() {
        Some(latest) => normalize_bar(latest, field_set).map(Some),
        None => Ok(None),
    }
}

/// Fetches one symbol's most recent session and normalizes it.
pub struct QuoteNormalizer {
    fetcher: Arc<dyn QuoteFetcher>,
    timeout: Option<Duration>,
}

impl QuoteNormalizer {
    pub fn new(fetcher: Arc<dyn QuoteFetcher>) -> Self {
        Self {
            fetcher,
            timeout: None,
        }
    }

    /// Bound every fetch by `timeout`. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fetcher_id(&self) -> &'static str {
        self.fetcher.id()
    }

    async fn fetch(&self, symbol: &str) -> Result<Vec<Bar>, MarketDataError> {
        let request = self
            .fetcher
            .fetch_bars(symbol, SessionWindow::MostRecentSession);

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| MarketDataError::Timeout {
                    provider: self.fetcher.id().to_string(),
                })?,
            None => request.await,
        }
    }

    /// Fetch and normalize `symbol`, reporting what happened.
    pub async fn try_normalize(&self, symbol: &str, field_set: FieldSet) -> NormalizeOutcome {
        let bars = match self.fetch(symbol).await {
            Ok(bars) => bars,
            Err(MarketDataError::NoDataForRange) => return NormalizeOutcome::EmptyResult,
            Err(e) => return NormalizeOutcome::FetchFailure(e.to_string()),
        };

        match normalize_bars(&bars, field_set) {
            Ok(Some(quote)) => NormalizeOutcome::Success(quote),
            Ok(None) => NormalizeOutcome::EmptyResult,
            Err(e) => NormalizeOutcome::FetchFailure(e.to_string()),
        }
    }

    /// Fetch and normalize `symbol`, logging any failure.
    ///
    /// Emits exactly one warning per unavailable symbol and never fails.
    pub async fn normalize(&self, symbol: &str, field_set: FieldSet) -> Option<Quote> {
        match self.try_normalize(symbol, field_set).await {
            NormalizeOutcome::Success(quote) => {
                debug!("Normalized {} for session {}", symbol, quote.date_string());
                Some(quote)
            }
            NormalizeOutcome::EmptyResult => {
                warn!(
                    symbol = %symbol,
                    "No data returned for {} in the most recent session", symbol
                );
                None
            }
            NormalizeOutcome::FetchFailure(detail) => {
                warn!(
                    symbol = %symbol,
                    "Failed to fetch data for {}: {}", symbol, detail
                );
                None
            }
        }
    }

    /// [`normalize`](Self::normalize) using the instrument's own field set.
    pub async fn normalize_instrument(&self, instrument: &Instrument) -> Option<Quote> {
        self.normalize(&instrument.symbol, instrument.field_set()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuoteFields;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    // ------------------------------------------------------------------
    // Fetcher double
    // ------------------------------------------------------------------

    struct MockFetcher {
        bars: Vec<Bar>,
        should_fail: bool,
        delay: Option<Duration>,
        call_count: AtomicUsize,
    }

    impl MockFetcher {
        fn with_bars(bars: Vec<Bar>) -> Self {
            Self {
                bars,
                should_fail: false,
                delay: None,
                call_count: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::with_bars(vec![])
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::with_bars(vec![sample_bar()])
            }
        }
    }

    #[async_trait]
    impl QuoteFetcher for MockFetcher {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn fetch_bars(
            &self,
            symbol: &str,
            _window: SessionWindow,
        ) -> Result<Vec<Bar>, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.should_fail {
                Err(MarketDataError::SymbolNotFound(symbol.to_string()))
            } else {
                Ok(self.bars.clone())
            }
        }
    }

    // ------------------------------------------------------------------
    // Log capture
    // ------------------------------------------------------------------

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

    impl Captured {
        fn push(&self, level: Level, line: String) {
            self.0.lock().unwrap().push((level, line));
        }

        fn warnings(&self) -> Vec<String> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|(level, _)| *level == Level::WARN)
                .map(|(_, line)| line.clone())
                .collect()
        }
    }

    struct CaptureLayer(Captured);

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = LineVisitor::default();
            event.record(&mut visitor);
            self.0.push(*event.metadata().level(), visitor.line);
        }
    }

    #[derive(Default)]
    struct LineVisitor {
        line: String,
    }

    impl Visit for LineVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if !self.line.is_empty() {
                self.line.push(' ');
            }
            if field.name() == "message" {
                self.line.push_str(&format!("{:?}", value));
            } else {
                self.line.push_str(&format!("{}={:?}", field.name(), value));
            }
        }
    }

    fn capture_logs() -> (Captured, tracing::subscriber::DefaultGuard) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(CaptureLayer(captured.clone()));
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    // ------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn sample_bar() -> Bar {
        Bar::new(
            march(1),
            dec!(500.123),
            dec!(505.988),
            dec!(498.001),
            dec!(503.456),
            dec!(1234567.4),
        )
    }

    fn build_normalizer(fetcher: MockFetcher) -> (QuoteNormalizer, Arc<MockFetcher>) {
        let fetcher = Arc::new(fetcher);
        (QuoteNormalizer::new(fetcher.clone()), fetcher)
    }

    // ------------------------------------------------------------------
    // Pure helpers
    // ------------------------------------------------------------------

    #[test]
    fn test_round_price_half_away_from_zero() {
        assert_eq!(round_price(dec!(65432.105)), dec!(65432.11));
        assert_eq!(round_price(dec!(0.125)), dec!(0.13));
        assert_eq!(round_price(dec!(0.135)), dec!(0.14));
        assert_eq!(round_price(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_price(dec!(505.988)), dec!(505.99));
        assert_eq!(round_price(dec!(500.123)), dec!(500.12));
    }

    #[test]
    fn test_round_price_always_two_places() {
        assert_eq!(round_price(dec!(498.001)).to_string(), "498.00");
        assert_eq!(round_price(dec!(500)).to_string(), "500.00");
        assert_eq!(round_price(dec!(1.5)).to_string(), "1.50");
        assert_eq!(round_price(dec!(1.5)).scale(), PRICE_DECIMALS);
    }

    #[test]
    fn test_truncate_volume() {
        assert_eq!(truncate_volume(dec!(1234567.4)).unwrap(), 1_234_567);
        assert_eq!(truncate_volume(dec!(1234567.9)).unwrap(), 1_234_567);
        assert_eq!(truncate_volume(dec!(0)).unwrap(), 0);
    }

    #[test]
    fn test_truncate_negative_volume_fails() {
        let err = truncate_volume(dec!(-3)).unwrap_err();
        assert!(matches!(err, MarketDataError::ValidationFailed { .. }));
    }

    #[test]
    fn test_normalize_bars_empty() {
        assert_eq!(normalize_bars(&[], FieldSet::Full).unwrap(), None);
        assert_eq!(normalize_bars(&[], FieldSet::PriceOnly).unwrap(), None);
    }

    #[test]
    fn test_normalize_bars_uses_last_bar() {
        let older = Bar::new(march(1), dec!(1), dec!(1), dec!(1), dec!(1), dec!(1));
        let latest = Bar::new(march(4), dec!(2), dec!(2), dec!(2), dec!(2.345), dec!(2));

        let quote = normalize_bars(&[older, latest], FieldSet::PriceOnly)
            .unwrap()
            .unwrap();
        assert_eq!(quote, Quote::price_only(march(4), dec!(2.35)));
    }

    // ------------------------------------------------------------------
    // Normalizer
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_full_form_scenario() {
        let (normalizer, fetcher) = build_normalizer(MockFetcher::with_bars(vec![sample_bar()]));

        let quote = normalizer.normalize("SPY", FieldSet::Full).await.unwrap();

        assert_eq!(quote.date_string(), "2024-03-01");
        assert_eq!(
            quote.fields,
            QuoteFields::Full {
                open: dec!(500.12),
                high: dec!(505.99),
                low: dec!(498.00),
                close: dec!(503.46),
                volume: 1_234_567,
            }
        );
        assert_eq!(quote.labeled_values().len(), 5);
        assert_eq!(fetcher.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_price_only_scenario() {
        let bar = Bar::new(
            march(1),
            dec!(64000),
            dec!(66000),
            dec!(63500),
            dec!(65432.105),
            dec!(0),
        );
        let (normalizer, _) = build_normalizer(MockFetcher::with_bars(vec![bar]));

        let quote = normalizer
            .normalize("BTC-USD", FieldSet::PriceOnly)
            .await
            .unwrap();

        assert_eq!(quote, Quote::price_only(march(1), dec!(65432.11)));
        assert_eq!(quote.labeled_values().len(), 1);
    }

    #[tokio::test]
    async fn test_normalize_instrument_uses_kind() {
        let (normalizer, _) = build_normalizer(MockFetcher::with_bars(vec![sample_bar()]));

        let crypto = normalizer
            .normalize_instrument(&Instrument::crypto("BTC-USD"))
            .await
            .unwrap();
        let index = normalizer
            .normalize_instrument(&Instrument::index("000001.SS"))
            .await
            .unwrap();

        assert_eq!(crypto.field_set(), FieldSet::PriceOnly);
        assert_eq!(index.field_set(), FieldSet::Full);
    }

    #[tokio::test]
    async fn test_empty_result_logs_once() {
        let (captured, _guard) = capture_logs();
        let (normalizer, _) = build_normalizer(MockFetcher::with_bars(vec![]));

        assert_eq!(
            normalizer.try_normalize("QQQ", FieldSet::Full).await,
            NormalizeOutcome::EmptyResult
        );
        assert!(captured.warnings().is_empty());

        let quote = normalizer.normalize("QQQ", FieldSet::Full).await;

        assert!(quote.is_none());
        let warnings = captured.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("QQQ"));
    }

    #[tokio::test]
    async fn test_fetch_failure_logs_symbol_and_error() {
        let (captured, _guard) = capture_logs();
        let (normalizer, _) = build_normalizer(MockFetcher::failing());

        let quote = normalizer.normalize("ZZZZ-INVALID", FieldSet::Full).await;

        assert!(quote.is_none());
        let warnings = captured.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ZZZZ-INVALID"));
        assert!(warnings[0].contains("Symbol not found"));
    }

    #[tokio::test]
    async fn test_fetch_failure_outcome_carries_detail() {
        let (normalizer, _) = build_normalizer(MockFetcher::failing());

        let outcome = normalizer
            .try_normalize("ZZZZ-INVALID", FieldSet::PriceOnly)
            .await;

        assert_eq!(
            outcome,
            NormalizeOutcome::FetchFailure("Symbol not found: ZZZZ-INVALID".to_string())
        );
        assert!(!outcome.is_success());
        assert_eq!(outcome.into_quote(), None);
    }

    #[tokio::test]
    async fn test_invalid_latest_bar_is_failure_not_partial_quote() {
        let bar = Bar::new(march(1), dec!(1), dec!(1), dec!(1), dec!(1), dec!(-10));
        let (normalizer, _) = build_normalizer(MockFetcher::with_bars(vec![bar]));

        let outcome = normalizer.try_normalize("SPY", FieldSet::Full).await;

        assert!(matches!(
            outcome,
            NormalizeOutcome::FetchFailure(ref detail) if detail.contains("Negative volume")
        ));
    }

    #[tokio::test]
    async fn test_no_data_for_range_is_empty_result() {
        struct NoDataFetcher;

        #[async_trait]
        impl QuoteFetcher for NoDataFetcher {
            fn id(&self) -> &'static str {
                "NO_DATA"
            }

            async fn fetch_bars(
                &self,
                _symbol: &str,
                _window: SessionWindow,
            ) -> Result<Vec<Bar>, MarketDataError> {
                Err(MarketDataError::NoDataForRange)
            }
        }

        let normalizer = QuoteNormalizer::new(Arc::new(NoDataFetcher));
        assert_eq!(normalizer.fetcher_id(), "NO_DATA");
        assert_eq!(
            normalizer.try_normalize("000001.SS", FieldSet::Full).await,
            NormalizeOutcome::EmptyResult
        );
    }

    #[tokio::test]
    async fn test_normalize_is_idempotent() {
        let (normalizer, fetcher) = build_normalizer(MockFetcher::with_bars(vec![sample_bar()]));

        let first = normalizer.normalize("SPY", FieldSet::Full).await;
        let second = normalizer.normalize("SPY", FieldSet::Full).await;

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(fetcher.call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_failure() {
        let (captured, _guard) = capture_logs();
        let fetcher = Arc::new(MockFetcher::slow(Duration::from_secs(60)));
        let normalizer =
            QuoteNormalizer::new(fetcher.clone()).with_timeout(Some(Duration::from_secs(5)));

        let outcome = normalizer.try_normalize("SPY", FieldSet::Full).await;
        assert_eq!(
            outcome,
            NormalizeOutcome::FetchFailure("Timeout: MOCK".to_string())
        );

        assert!(normalizer.normalize("SPY", FieldSet::Full).await.is_none());
        assert_eq!(captured.warnings().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_within_timeout_succeeds() {
        let fetcher = Arc::new(MockFetcher::slow(Duration::from_secs(1)));
        let normalizer =
            QuoteNormalizer::new(fetcher.clone()).with_timeout(Some(Duration::from_secs(5)));

        assert!(normalizer
            .try_normalize("SPY", FieldSet::Full)
            .await
            .is_success());
    }
}
