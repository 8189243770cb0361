use marketbrief_market_data::{Quote, QuoteNormalizer};

use crate::watchlist::WatchlistEntry;

/// Outcome of one watchlist lookup. `quote` is `None` when unavailable.
#[derive(Clone, Debug)]
pub struct InstrumentReport {
    pub entry: WatchlistEntry,
    pub quote: Option<Quote>,
}

/// Look up every entry in order, one at a time.
///
/// Failures are already logged by the normalizer and never stop the
/// remaining lookups.
pub async fn collect_reports(
    normalizer: &QuoteNormalizer,
    entries: &[WatchlistEntry],
) -> Vec<InstrumentReport> {
    let mut reports = Vec::with_capacity(entries.len());
    for entry in entries {
        let quote = normalizer.normalize_instrument(&entry.instrument).await;
        reports.push(InstrumentReport {
            entry: entry.clone(),
            quote,
        });
    }
    reports
}
