// src/handlers/returns.rs
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{normalize_ticker, Period};
use crate::services::analytics;
use crate::services::store::{HistoryKey, HistoryStore};
use crate::services::yahoo;

/// Windows shown in the annualized-returns table.
pub const RETURN_WINDOWS: [Period; 3] = [Period::OneYear, Period::ThreeYears, Period::FiveYears];

pub const CAGR_EXPLANATION: &str =
    "CAGR = (end value / start value)^(1 / years) - 1, with years taken as trading days / 252";

#[derive(Debug, Serialize)]
pub struct ReturnsRow {
    pub symbol: String,
    pub period: Period,
    pub cagr_pct: f64,
}

#[derive(Debug, Serialize)]
struct ReturnsResponse {
    symbol: String,
    rows: Vec<ReturnsRow>,
    explanation: &'static str,
    warnings: Vec<String>,
}

/// Compute the returns table rows for one ticker, fetching each window
/// independently. Windows that fail or come back too short are skipped
/// with a warning.
pub async fn returns_rows(
    store: &Arc<HistoryStore>,
    ticker: &str,
) -> (Vec<ReturnsRow>, Vec<String>) {
    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for period in RETURN_WINDOWS {
        let key = HistoryKey::new(ticker, period);
        let symbol = ticker.to_string();
        let fetched = store
            .get_or_fetch(key, || async move {
                yahoo::fetch_price_history(&symbol, period).await
            })
            .await;

        match fetched {
            Ok(series) => match analytics::period_cagr(&series) {
                Some(r) => rows.push(ReturnsRow {
                    symbol: ticker.to_string(),
                    period,
                    cagr_pct: r * 100.0,
                }),
                None => {
                    warnings.push(format!("Not enough {} data for {}", period, ticker));
                }
            },
            Err(e) => {
                warn!("Returns window fetch failed for {} {}: {}", ticker, period, e);
                warnings.push(format!("Could not fetch {} data for {}", period, ticker));
            }
        }
    }

    (rows, warnings)
}

pub async fn get_returns(symbol: String, store: Arc<HistoryStore>) -> Result<Json, Rejection> {
    let ticker = normalize_ticker(&symbol)
        .ok_or_else(|| warp::reject::custom(ApiError::invalid_ticker(&symbol)))?;
    info!("Handling returns request for {}", ticker);

    let (rows, mut warnings) = returns_rows(&store, &ticker).await;
    if rows.is_empty() {
        warnings.push(format!("Could not compute annualized returns for {}", ticker));
    }

    Ok(warp::reply::json(&ReturnsResponse {
        symbol: ticker,
        rows,
        explanation: CAGR_EXPLANATION,
        warnings,
    }))
}
