// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One daily OHLC bar as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

/// A per-ticker time series of daily bars, held verbatim from the provider
/// for the duration of one render pass (plus TTL memoization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Whether the series carries usable adjusted-close values.
    fn has_adjusted(&self) -> bool {
        self.bars.iter().any(|b| b.adjclose > 0.0)
    }

    /// The price column used for all derived metrics: adjusted close when
    /// the provider supplied it, plain close otherwise.
    pub fn closing_prices(&self) -> Vec<f64> {
        if self.has_adjusted() {
            self.bars.iter().map(|b| b.adjclose).collect()
        } else {
            self.bars.iter().map(|b| b.close).collect()
        }
    }
}

/// Flat key-value company/fundamentals fields from the provider. Missing
/// fields stay `None` and serialize as null; the frontend shows "N/D".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub long_business_summary: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
}

impl CompanyProfile {
    pub fn empty(symbol: impl Into<String>) -> Self {
        CompanyProfile {
            symbol: symbol.into(),
            ..Default::default()
        }
    }
}

/// A recent news item for a ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub uuid: String,
    pub title: String,
    pub publisher: String,
    pub link: String,
    pub summary: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Historical period selector offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneYear => "1y",
            Period::ThreeYears => "3y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
        }
    }

    /// Calendar days covered by the period when mapping to a start date.
    pub fn calendar_days(&self) -> i64 {
        match self {
            Period::OneYear => 365,
            Period::ThreeYears => 1095,
            Period::FiveYears => 1825,
            Period::TenYears => 3650,
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::FiveYears
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1y" => Ok(Period::OneYear),
            "3y" => Ok(Period::ThreeYears),
            "5y" => Ok(Period::FiveYears),
            "10y" => Ok(Period::TenYears),
            other => Err(format!("Unknown period: {}", other)),
        }
    }
}

/// Chart-style toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    Line,
    Candles,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle::Line
    }
}

impl FromStr for ChartStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(ChartStyle::Line),
            "candles" => Ok(ChartStyle::Candles),
            other => Err(format!("Unknown chart style: {}", other)),
        }
    }
}

/// One point of a line chart series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinePoint {
    pub date: DateTime<Utc>,
    pub price: f64,
}

/// One candle of a candlestick series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Render-ready chart payload for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "chart", rename_all = "lowercase")]
pub enum ChartSeries {
    Line { symbol: String, points: Vec<LinePoint> },
    Candles { symbol: String, candles: Vec<Candle> },
}

impl ChartSeries {
    pub fn from_series(series: &PriceSeries, style: ChartStyle) -> Self {
        match style {
            ChartStyle::Line => {
                let prices = series.closing_prices();
                let points = series
                    .bars
                    .iter()
                    .zip(prices)
                    .map(|(bar, price)| LinePoint {
                        date: bar.timestamp,
                        price,
                    })
                    .collect();
                ChartSeries::Line {
                    symbol: series.symbol.clone(),
                    points,
                }
            }
            ChartStyle::Candles => {
                let candles = series
                    .bars
                    .iter()
                    .map(|bar| Candle {
                        date: bar.timestamp,
                        open: bar.open,
                        high: bar.high,
                        low: bar.low,
                        close: bar.close,
                    })
                    .collect();
                ChartSeries::Candles {
                    symbol: series.symbol.clone(),
                    candles,
                }
            }
        }
    }
}

/// Upper-case and sanity-check a user-supplied ticker. Returns `None` for
/// input no provider would accept.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() || ticker.len() > 10 {
        return None;
    }
    if ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        Some(ticker)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(close: f64, adjclose: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
            adjclose,
        }
    }

    #[test]
    fn closing_prices_prefer_adjusted() {
        let series = PriceSeries {
            symbol: "NVDA".into(),
            bars: vec![bar(10.0, 9.5), bar(11.0, 10.4)],
        };
        assert_eq!(series.closing_prices(), vec![9.5, 10.4]);
    }

    #[test]
    fn closing_prices_fall_back_to_close() {
        let series = PriceSeries {
            symbol: "NVDA".into(),
            bars: vec![bar(10.0, 0.0), bar(11.0, 0.0)],
        };
        assert_eq!(series.closing_prices(), vec![10.0, 11.0]);
    }

    #[test]
    fn period_parses_all_variants() {
        for (s, p) in [
            ("1y", Period::OneYear),
            ("3y", Period::ThreeYears),
            ("5y", Period::FiveYears),
            ("10y", Period::TenYears),
        ] {
            assert_eq!(s.parse::<Period>().unwrap(), p);
            assert_eq!(p.as_str(), s);
        }
        assert!("2y".parse::<Period>().is_err());
        assert!("".parse::<Period>().is_err());
    }

    #[test]
    fn chart_style_parses() {
        assert_eq!("line".parse::<ChartStyle>().unwrap(), ChartStyle::Line);
        assert_eq!(
            "candles".parse::<ChartStyle>().unwrap(),
            ChartStyle::Candles
        );
        assert!("velas".parse::<ChartStyle>().is_err());
    }

    #[test]
    fn normalize_ticker_uppercases() {
        assert_eq!(normalize_ticker(" nvda "), Some("NVDA".to_string()));
        assert_eq!(normalize_ticker("brk.b"), Some("BRK.B".to_string()));
        assert_eq!(normalize_ticker("^gspc"), Some("^GSPC".to_string()));
    }

    #[test]
    fn normalize_ticker_rejects_garbage() {
        assert_eq!(normalize_ticker(""), None);
        assert_eq!(normalize_ticker("   "), None);
        assert_eq!(normalize_ticker("NOT A TICKER"), None);
        assert_eq!(normalize_ticker("WAYTOOLONGSYMBOL"), None);
    }

    #[test]
    fn chart_series_line_uses_price_column() {
        let series = PriceSeries {
            symbol: "AMD".into(),
            bars: vec![bar(10.0, 9.5), bar(12.0, 11.3)],
        };
        match ChartSeries::from_series(&series, ChartStyle::Line) {
            ChartSeries::Line { symbol, points } => {
                assert_eq!(symbol, "AMD");
                assert_eq!(points.len(), 2);
                assert_eq!(points[1].price, 11.3);
            }
            other => panic!("expected line series, got {:?}", other),
        }
    }
}
