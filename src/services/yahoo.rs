// src/services/yahoo.rs
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::models::{NewsItem, Period, PriceBar, PriceSeries};
use crate::BoxError;

fn connector() -> Result<yahoo::YahooConnector, BoxError> {
    yahoo::YahooConnector::new().map_err(|e| format!("Yahoo connector error: {}", e).into())
}

fn to_offset(dt: DateTime<Utc>) -> Result<OffsetDateTime, BoxError> {
    OffsetDateTime::from_unix_timestamp(dt.timestamp())
        .map_err(|e| format!("Invalid timestamp: {}", e).into())
}

/// Fetch daily OHLC bars for one ticker over a dashboard period.
pub async fn fetch_price_history(symbol: &str, period: Period) -> Result<PriceSeries, BoxError> {
    let end = Utc::now();
    let start = end - Duration::days(period.calendar_days());
    info!("Fetching {} history for {}", period, symbol);

    let provider = connector()?;
    let response = provider
        .get_quote_history(symbol, to_offset(start)?, to_offset(end)?)
        .await
        .map_err(|e| format!("Yahoo history error for {}: {}", symbol, e))?;

    let quotes = response
        .quotes()
        .map_err(|e| format!("Yahoo quote parse error for {}: {}", symbol, e))?;

    let bars = quotes
        .iter()
        .map(|q| PriceBar {
            timestamp: DateTime::from_timestamp(q.timestamp as i64, 0).unwrap_or_else(Utc::now),
            open: q.open,
            high: q.high,
            low: q.low,
            close: q.close,
            volume: q.volume,
            adjclose: q.adjclose,
        })
        .collect::<Vec<_>>();

    if bars.is_empty() {
        warn!("Empty price series returned for {}", symbol);
    }

    Ok(PriceSeries {
        symbol: symbol.to_string(),
        bars,
    })
}

/// Latest close for a ticker, used as a cheap existence probe.
pub async fn fetch_latest_close(symbol: &str) -> Result<f64, BoxError> {
    let provider = connector()?;
    let response = provider
        .get_latest_quotes(symbol, "1d")
        .await
        .map_err(|e| format!("Yahoo quote error for {}: {}", symbol, e))?;
    let quote = response
        .last_quote()
        .map_err(|e| format!("No quote for {}: {}", symbol, e))?;
    Ok(quote.close)
}

/// Whether the provider recognizes the symbol at all.
pub async fn validate_ticker(symbol: &str) -> bool {
    match fetch_latest_close(symbol).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Ticker validation failed for {}: {}", symbol, e);
            false
        }
    }
}

/// Recent news items for a ticker via the Yahoo search feed, newest first.
pub async fn fetch_news(symbol: &str, limit: usize) -> Result<Vec<NewsItem>, BoxError> {
    info!("Fetching news for {}", symbol);
    let provider = connector()?;
    let result = provider
        .search_ticker(symbol)
        .await
        .map_err(|e| format!("Yahoo news error for {}: {}", symbol, e))?;

    let mut items: Vec<NewsItem> = result
        .news
        .into_iter()
        .map(|n| NewsItem {
            uuid: n.uuid,
            title: n.title,
            publisher: n.publisher,
            link: n.link,
            // The search feed carries no article summary
            summary: None,
            published_at: DateTime::from_timestamp(n.provider_publish_time as i64, 0)
                .unwrap_or_else(Utc::now),
        })
        .collect();

    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items.truncate(limit);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_price_history() {
        let series = fetch_price_history("AAPL", Period::OneYear).await.unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert!(!series.is_empty());
        assert!(series.closing_prices().iter().all(|p| *p > 0.0));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_validate_ticker() {
        assert!(validate_ticker("AAPL").await);
        assert!(!validate_ticker("INVALID_SYMBOL_12345").await);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_news_limit() {
        let items = fetch_news("AAPL", 3).await.unwrap();
        assert!(items.len() <= 3);
    }
}
