// src/handlers/risk.rs
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::history::{load_history, parse_period};
use crate::models::{normalize_ticker, Period};
use crate::services::analytics::{self, RiskStats};
use crate::services::store::HistoryStore;

/// Bin count of the daily-return distribution chart.
pub const RETURN_HISTOGRAM_BINS: usize = 50;

#[derive(Debug, Serialize)]
pub struct RiskSection {
    pub symbol: String,
    pub period: Period,
    #[serde(flatten)]
    pub stats: RiskStats,
}

pub async fn get_risk(
    symbol: String,
    period: String,
    store: Arc<HistoryStore>,
) -> Result<Json, Rejection> {
    let ticker = normalize_ticker(&symbol)
        .ok_or_else(|| warp::reject::custom(ApiError::invalid_ticker(&symbol)))?;
    let period = parse_period(&period)?;
    info!("Handling {} risk request for {}", period, ticker);

    let series = load_history(&store, &ticker, period).await?;
    let stats = analytics::risk_stats(&series, RETURN_HISTOGRAM_BINS).map_err(|e| {
        error!("Risk computation failed for {}: {}", ticker, e);
        warp::reject::custom(ApiError::no_data(format!(
            "Not enough data to compute volatility for {}",
            ticker
        )))
    })?;

    Ok(warp::reply::json(&RiskSection {
        symbol: ticker,
        period,
        stats,
    }))
}
