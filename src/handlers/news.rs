// src/handlers/news.rs
use log::{info, warn};
use serde::Serialize;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{normalize_ticker, NewsItem};
use crate::services::yahoo;

/// Number of news items shown by the dashboard.
pub const NEWS_LIMIT: usize = 3;

#[derive(Debug, Serialize)]
struct NewsResponse {
    symbol: String,
    items: Vec<NewsItem>,
    warning: Option<String>,
}

/// A news failure never fails the request; the section degrades to a
/// warning instead.
pub async fn get_news(symbol: String) -> Result<Json, Rejection> {
    let ticker = normalize_ticker(&symbol)
        .ok_or_else(|| warp::reject::custom(ApiError::invalid_ticker(&symbol)))?;
    info!("Handling news request for {}", ticker);

    let (items, warning) = match yahoo::fetch_news(&ticker, NEWS_LIMIT).await {
        Ok(items) if items.is_empty() => {
            (Vec::new(), Some("No recent news available".to_string()))
        }
        Ok(items) => (items, None),
        Err(e) => {
            warn!("Failed to fetch news for {}: {}", ticker, e);
            (Vec::new(), Some("Could not load news".to_string()))
        }
    };

    Ok(warp::reply::json(&NewsResponse {
        symbol: ticker,
        items,
        warning,
    }))
}
