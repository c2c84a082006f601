// src/services/analytics.rs
use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::PriceSeries;

/// Trading days per year, used for annualization throughout.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized-volatility bands shown next to the risk metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

/// Volatility metrics for one ticker over one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskStats {
    pub daily_volatility_pct: f64,
    pub annualized_volatility_pct: f64,
    pub band: RiskBand,
    pub histogram: Histogram,
}

/// Equal-width histogram of daily returns for the distribution chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    pub bin_start: f64,
    pub bin_width: f64,
    pub counts: Vec<u64>,
}

/// Percentage change between two observations. `None` when the reference
/// value is zero.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// Compound annual growth rate. Non-positive inputs fall outside the
/// formula's domain and yield 0.0 instead of NaN.
pub fn cagr(start_value: f64, end_value: f64, years: f64) -> f64 {
    if start_value <= 0.0 || end_value <= 0.0 || years <= 0.0 {
        0.0
    } else {
        (end_value / start_value).powf(1.0 / years) - 1.0
    }
}

/// Elapsed years represented by a run of daily bars.
pub fn years_from_trading_days(trading_days: usize) -> f64 {
    trading_days as f64 / TRADING_DAYS_PER_YEAR
}

/// Day-over-day fractional returns across a price column. Days following a
/// zero price are skipped.
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Sample standard deviation. `None` below two observations.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Daily volatility scaled to a yearly horizon by sqrt(252).
pub fn annualized_volatility(daily_volatility: f64) -> f64 {
    daily_volatility * TRADING_DAYS_PER_YEAR.sqrt()
}

pub fn risk_band(annualized_volatility: f64) -> RiskBand {
    if annualized_volatility < 0.15 {
        RiskBand::Low
    } else if annualized_volatility <= 0.30 {
        RiskBand::Moderate
    } else {
        RiskBand::High
    }
}

/// CAGR of a fetched price window: first close to last close, with years
/// derived from the trading-day count.
pub fn period_cagr(series: &PriceSeries) -> Option<f64> {
    let prices = series.closing_prices();
    if prices.len() < 2 {
        warn!(
            "Insufficient price data for {} ({} rows), skipping CAGR",
            series.symbol,
            prices.len()
        );
        return None;
    }
    let start = *prices.first()?;
    let end = *prices.last()?;
    let years = years_from_trading_days(prices.len());
    Some(cagr(start, end, years))
}

/// Bucket values into `bins` equal-width bins between min and max.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram {
            bin_start: 0.0,
            bin_width: 0.0,
            counts: Vec::new(),
        };
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // Degenerate spread collapses to a single bucket
    if max == min {
        let mut counts = vec![0u64; bins];
        counts[0] = values.len() as u64;
        return Histogram {
            bin_start: min,
            bin_width: 0.0,
            counts,
        };
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0u64; bins];
    for v in values {
        let mut idx = ((v - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }

    Histogram {
        bin_start: min,
        bin_width: width,
        counts,
    }
}

/// Full risk computation over a price series. `Err` when the series is too
/// short to produce a volatility figure.
pub fn risk_stats(series: &PriceSeries, bins: usize) -> Result<RiskStats> {
    let returns = daily_returns(&series.closing_prices());
    let daily = std_dev(&returns).ok_or_else(|| {
        anyhow::anyhow!(
            "Not enough price data for {} to compute volatility",
            series.symbol
        )
    })?;
    let annual = annualized_volatility(daily);

    Ok(RiskStats {
        daily_volatility_pct: daily * 100.0,
        annualized_volatility_pct: annual * 100.0,
        band: risk_band(annual),
        histogram: histogram(&returns, bins),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceBar;
    use chrono::{Duration, TimeZone, Utc};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
        PriceSeries {
            symbol: "TEST".into(),
            bars: closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PriceBar {
                    timestamp: start + Duration::days(i as i64),
                    open: c,
                    high: c,
                    low: c,
                    close: c,
                    volume: 0,
                    adjclose: c,
                })
                .collect(),
        }
    }

    #[test]
    fn cagr_is_zero_for_flat_prices() {
        assert_eq!(cagr(100.0, 100.0, 5.0), 0.0);
        assert_eq!(cagr(1.0, 1.0, 0.5), 0.0);
    }

    #[test]
    fn cagr_known_value() {
        // Doubling over one year is a 100% annual rate
        let r = cagr(50.0, 100.0, 1.0);
        assert!((r - 1.0).abs() < 1e-12);
        // Doubling over two years: sqrt(2) - 1
        let r = cagr(50.0, 100.0, 2.0);
        assert!((r - (2.0f64.sqrt() - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn cagr_monotone_in_end_value() {
        let mut prev = f64::NEG_INFINITY;
        for end in [50.0, 75.0, 100.0, 150.0, 400.0] {
            let r = cagr(100.0, end, 3.0);
            assert!(r > prev, "cagr not increasing at end={}", end);
            prev = r;
        }
    }

    #[test]
    fn cagr_guards_domain_gaps() {
        assert_eq!(cagr(0.0, 100.0, 1.0), 0.0);
        assert_eq!(cagr(-5.0, 100.0, 1.0), 0.0);
        assert_eq!(cagr(100.0, -5.0, 1.0), 0.0);
        assert_eq!(cagr(100.0, 200.0, 0.0), 0.0);
    }

    #[test]
    fn percent_change_basic() {
        assert_eq!(percent_change(110.0, 100.0), Some(10.0));
        assert_eq!(percent_change(90.0, 100.0), Some(-10.0));
        assert_eq!(percent_change(100.0, 0.0), None);
    }

    #[test]
    fn daily_returns_skips_zero_reference() {
        let returns = daily_returns(&[100.0, 110.0, 0.0, 50.0]);
        // 0.0 -> 50.0 step is dropped
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn std_dev_needs_two_points() {
        assert_eq!(std_dev(&[]), None);
        assert_eq!(std_dev(&[1.0]), None);
        assert_eq!(std_dev(&[2.0, 2.0, 2.0]), Some(0.0));
    }

    #[test]
    fn annualization_scales_by_sqrt_252() {
        let daily = 0.02;
        let annual = annualized_volatility(daily);
        assert!((annual / daily - 252.0f64.sqrt()).abs() < 1e-12);
        assert!(annualized_volatility(0.0) >= 0.0);
    }

    #[test]
    fn risk_bands_match_thresholds() {
        assert_eq!(risk_band(0.10), RiskBand::Low);
        assert_eq!(risk_band(0.20), RiskBand::Moderate);
        assert_eq!(risk_band(0.45), RiskBand::High);
    }

    #[test]
    fn period_cagr_flat_series_is_zero() {
        let series = series_from_closes(&[100.0; 252]);
        let r = period_cagr(&series).unwrap();
        assert!(r.abs() < 1e-12);
    }

    #[test]
    fn period_cagr_short_series_is_none() {
        assert!(period_cagr(&series_from_closes(&[])).is_none());
        assert!(period_cagr(&series_from_closes(&[100.0])).is_none());
    }

    #[test]
    fn histogram_mass_and_bins() {
        let values: Vec<f64> = (0..500).map(|i| (i as f64) / 500.0 - 0.5).collect();
        let hist = histogram(&values, 50);
        assert_eq!(hist.counts.len(), 50);
        assert_eq!(hist.counts.iter().sum::<u64>(), 500);
        assert!(hist.bin_width > 0.0);
    }

    #[test]
    fn histogram_handles_empty_and_degenerate_input() {
        let empty = histogram(&[], 50);
        assert!(empty.counts.is_empty());

        let flat = histogram(&[0.01, 0.01, 0.01], 50);
        assert_eq!(flat.counts.iter().sum::<u64>(), 3);
    }

    #[test]
    fn risk_stats_on_empty_series_errors() {
        let series = series_from_closes(&[]);
        assert!(risk_stats(&series, 50).is_err());
    }

    #[test]
    fn risk_stats_flat_series_has_zero_volatility() {
        let series = series_from_closes(&[100.0; 30]);
        let stats = risk_stats(&series, 50).unwrap();
        assert_eq!(stats.daily_volatility_pct, 0.0);
        assert_eq!(stats.annualized_volatility_pct, 0.0);
        assert_eq!(stats.band, RiskBand::Low);
    }
}
