use std::time::Duration;

use marketbrief_market_data::YahooEndpoint;

use crate::render::Language;

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

pub struct Config {
    pub log_format: LogFormat,
    /// Upper bound on a single fetch; `None` waits indefinitely
    pub fetch_timeout: Option<Duration>,
    pub language: Language,
    pub yahoo_endpoint: YahooEndpoint,
    /// Problems found while reading the environment. Logged once tracing is up.
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let log_format = match lookup("MB_LOG_FORMAT") {
            Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(value) if value.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(value) => {
                warnings.push(format!("Ignoring MB_LOG_FORMAT={}, using text", value));
                LogFormat::Text
            }
            None => LogFormat::Text,
        };

        let timeout_ms = match lookup("MB_FETCH_TIMEOUT_MS") {
            Some(value) => value.trim().parse::<u64>().unwrap_or_else(|_| {
                warnings.push(format!(
                    "Ignoring MB_FETCH_TIMEOUT_MS={}, using {}",
                    value, DEFAULT_FETCH_TIMEOUT_MS
                ));
                DEFAULT_FETCH_TIMEOUT_MS
            }),
            None => DEFAULT_FETCH_TIMEOUT_MS,
        };
        let fetch_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

        let language = match lookup("MB_LANG") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warnings.push(format!("{}, using en", e));
                Language::En
            }),
            None => Language::En,
        };

        let yahoo_endpoint = match lookup("MB_YAHOO_ENDPOINT") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warnings.push(format!("{}, using chart", e));
                YahooEndpoint::Chart
            }),
            None => YahooEndpoint::Chart,
        };

        Self {
            log_format,
            fetch_timeout,
            language,
            yahoo_endpoint,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.fetch_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.language, Language::En);
        assert_eq!(config.yahoo_endpoint, YahooEndpoint::Chart);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MB_LOG_FORMAT", "JSON"),
            ("MB_FETCH_TIMEOUT_MS", "1500"),
            ("MB_LANG", "zh"),
            ("MB_YAHOO_ENDPOINT", "quote_summary"),
        ]);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.fetch_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.language, Language::Zh);
        assert_eq!(config.yahoo_endpoint, YahooEndpoint::QuoteSummary);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = config_from(&[("MB_FETCH_TIMEOUT_MS", "0")]);
        assert_eq!(config.fetch_timeout, None);
    }

    #[test]
    fn test_bad_values_fall_back_with_warnings() {
        let config = config_from(&[
            ("MB_LOG_FORMAT", "xml"),
            ("MB_FETCH_TIMEOUT_MS", "soon"),
            ("MB_LANG", "fr"),
            ("MB_YAHOO_ENDPOINT", "websocket"),
        ]);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.fetch_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.language, Language::En);
        assert_eq!(config.yahoo_endpoint, YahooEndpoint::Chart);
        assert_eq!(config.warnings.len(), 4);
        assert!(config.warnings[1].contains("MB_FETCH_TIMEOUT_MS=soon"));
    }
}
