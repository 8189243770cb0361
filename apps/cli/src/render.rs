//! Console rendering of instrument reports.
//!
//! Every block ends with a blank line. Full quotes print a header followed
//! by five indented fields; price-only quotes print a single line.

use std::str::FromStr;

use marketbrief_market_data::{FieldSet, QuoteField};

use crate::report::InstrumentReport;

/// Report language
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "zh" | "zh-cn" => Ok(Self::Zh),
            other => Err(format!("unknown language '{}'", other)),
        }
    }
}

pub fn field_label(field: QuoteField, language: Language) -> &'static str {
    match language {
        Language::En => field.as_str(),
        Language::Zh => match field {
            QuoteField::Open => "开盘价",
            QuoteField::High => "最高价",
            QuoteField::Low => "最低价",
            QuoteField::Close => "收盘价",
            QuoteField::Volume => "成交量",
        },
    }
}

/// Render one report as a text block.
pub fn render_report(report: &InstrumentReport, language: Language) -> String {
    let name = report.entry.display_name(language);

    let Some(quote) = &report.quote else {
        return unavailable_line(name, report.entry.instrument.field_set(), language);
    };

    let date = quote.date_string();
    match quote.field_set() {
        FieldSet::Full => {
            let mut block = match language {
                Language::En => format!("{} latest data ({}):\n", name, date),
                Language::Zh => format!("{} 最新数据 ({}):\n", name, date),
            };
            for (field, value) in quote.labeled_values() {
                block.push_str(&format!("  {}: {}\n", field_label(field, language), value));
            }
            block.push('\n');
            block
        }
        FieldSet::PriceOnly => match language {
            Language::En => format!("{} latest price ({}): {}\n\n", name, date, quote.close()),
            Language::Zh => format!("{} 最新价格 ({}): {}\n\n", name, date, quote.close()),
        },
    }
}

fn unavailable_line(name: &str, field_set: FieldSet, language: Language) -> String {
    match (language, field_set) {
        (Language::En, FieldSet::Full) => {
            format!("Could not retrieve the latest data for {}.\n\n", name)
        }
        (Language::En, FieldSet::PriceOnly) => {
            format!("Could not retrieve the latest price for {}.\n\n", name)
        }
        (Language::Zh, FieldSet::Full) => format!("未能获取 {} 的最新数据。\n\n", name),
        (Language::Zh, FieldSet::PriceOnly) => format!("未能获取 {} 的最新价格。\n\n", name),
    }
}

/// Render all reports in order.
pub fn render_reports(reports: &[InstrumentReport], language: Language) -> String {
    reports
        .iter()
        .map(|report| render_report(report, language))
        .collect()
}
