// src/handlers/history.rs
use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{normalize_ticker, ChartSeries, ChartStyle, Period, PriceSeries};
use crate::services::store::{HistoryKey, HistoryStore};
use crate::services::yahoo;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub chart: Option<String>,
}

/// Fetch one ticker's history through the TTL store, rejecting when the
/// provider fails or returns nothing.
pub async fn load_history(
    store: &Arc<HistoryStore>,
    ticker: &str,
    period: Period,
) -> Result<PriceSeries, Rejection> {
    let key = HistoryKey::new(ticker, period);
    let symbol = ticker.to_string();
    let series = store
        .get_or_fetch(key, || async move {
            yahoo::fetch_price_history(&symbol, period).await
        })
        .await
        .map_err(|e| {
            error!("Failed to fetch history for {}: {}", ticker, e);
            warp::reject::custom(ApiError::external_error(format!(
                "Failed to fetch price data for {}",
                ticker
            )))
        })?;

    if series.is_empty() {
        return Err(warp::reject::custom(ApiError::no_data(format!(
            "No price data available for {}",
            ticker
        ))));
    }
    Ok(series)
}

pub fn parse_period(raw: &str) -> Result<Period, Rejection> {
    raw.parse::<Period>()
        .map_err(|e| warp::reject::custom(ApiError::invalid_request(e)))
}

pub fn parse_chart(raw: Option<&str>) -> Result<ChartStyle, Rejection> {
    match raw {
        None => Ok(ChartStyle::default()),
        Some(s) => s
            .parse::<ChartStyle>()
            .map_err(|e| warp::reject::custom(ApiError::invalid_request(e))),
    }
}

pub async fn get_history(
    symbol: String,
    period: String,
    query: HistoryQuery,
    store: Arc<HistoryStore>,
) -> Result<Json, Rejection> {
    let ticker = normalize_ticker(&symbol)
        .ok_or_else(|| warp::reject::custom(ApiError::invalid_ticker(&symbol)))?;
    let period = parse_period(&period)?;
    let style = parse_chart(query.chart.as_deref())?;
    info!("Handling {} history request for {}", period, ticker);

    let series = load_history(&store, &ticker, period).await?;
    Ok(warp::reply::json(&ChartSeries::from_series(
        &series, style,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_defaults_to_line() {
        assert_eq!(parse_chart(None).unwrap(), ChartStyle::Line);
        assert_eq!(parse_chart(Some("candles")).unwrap(), ChartStyle::Candles);
        assert!(parse_chart(Some("pie")).is_err());
    }

    #[test]
    fn period_parsing_rejects_unknown() {
        assert!(parse_period("5y").is_ok());
        assert!(parse_period("7y").is_err());
    }
}
