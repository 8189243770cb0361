use std::io::Write;
use std::sync::Arc;

use marketbrief_market_data::{QuoteFetcher, QuoteNormalizer, YahooProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};
use crate::render::render_reports;
use crate::report::collect_reports;
use crate::watchlist::WatchlistEntry;

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// the report.
pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

pub fn build_fetcher(config: &Config) -> anyhow::Result<Arc<dyn QuoteFetcher>> {
    let provider = YahooProvider::new(config.yahoo_endpoint)?;
    tracing::debug!("Using Yahoo endpoint {:?}", provider.endpoint());
    Ok(Arc::new(provider))
}

pub fn build_normalizer(config: &Config, fetcher: Arc<dyn QuoteFetcher>) -> QuoteNormalizer {
    QuoteNormalizer::new(fetcher).with_timeout(config.fetch_timeout)
}

/// Look up every watchlist entry and write the rendered report to `out`.
///
/// Unavailable instruments are part of the report, not errors. Only a
/// failure to write the output is returned.
pub async fn run<W: Write>(
    config: &Config,
    normalizer: &QuoteNormalizer,
    watchlist: &[WatchlistEntry],
    out: &mut W,
) -> anyhow::Result<()> {
    let reports = collect_reports(normalizer, watchlist).await;
    let available = reports.iter().filter(|r| r.quote.is_some()).count();
    tracing::info!(
        "Retrieved {} of {} instruments from {}",
        available,
        reports.len(),
        normalizer.fetcher_id()
    );

    out.write_all(render_reports(&reports, config.language).as_bytes())?;
    out.flush()?;
    Ok(())
}
