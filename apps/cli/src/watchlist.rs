use marketbrief_market_data::Instrument;

use crate::render::Language;

/// An instrument in the report together with its display names.
#[derive(Clone, Debug)]
pub struct WatchlistEntry {
    pub instrument: Instrument,
    pub name_en: &'static str,
    pub name_zh: &'static str,
}

impl WatchlistEntry {
    pub fn new(instrument: Instrument, name_en: &'static str, name_zh: &'static str) -> Self {
        Self {
            instrument,
            name_en,
            name_zh,
        }
    }

    pub fn display_name(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.name_en,
            Language::Zh => self.name_zh,
        }
    }
}

/// The fixed set of instruments reported on every run, in report order.
pub fn default_watchlist() -> Vec<WatchlistEntry> {
    vec![
        // S&P 500 through the SPY ETF
        WatchlistEntry::new(Instrument::equity("SPY"), "SP500 (SPY)", "SP500 (SPY)"),
        // Nasdaq-100 through the QQQ ETF
        WatchlistEntry::new(Instrument::equity("QQQ"), "Nasdaq (QQQ)", "纳斯达克 (QQQ)"),
        WatchlistEntry::new(
            Instrument::crypto("BTC-USD"),
            "Bitcoin (BTC-USD)",
            "比特币 (BTC-USD)",
        ),
        WatchlistEntry::new(
            Instrument::index("000001.SS"),
            "SSE Composite (000001.SS)",
            "上证指数",
        ),
    ]
}
