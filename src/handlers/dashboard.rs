// src/handlers/dashboard.rs
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::history::{load_history, parse_chart, parse_period};
use super::news::NEWS_LIMIT;
use super::profile::ProfileSection;
use super::returns::{returns_rows, ReturnsRow, CAGR_EXPLANATION};
use super::risk::{RiskSection, RETURN_HISTOGRAM_BINS};
use crate::models::{
    normalize_ticker, ChartSeries, ChartStyle, CompanyProfile, NewsItem, Period, PriceSeries,
};
use crate::services::store::HistoryStore;
use crate::services::{analytics, fundamentals, yahoo};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub ticker: String,
    pub compare: Option<String>,
    pub period: Option<String>,
    pub chart: Option<String>,
}

/// Everything one interaction renders, in section order.
#[derive(Debug, Serialize)]
struct DashboardResponse {
    ticker: String,
    compare: Option<String>,
    period: Period,
    companies: Vec<ProfileSection>,
    charts: Vec<ChartSeries>,
    returns: Vec<ReturnsRow>,
    returns_explanation: &'static str,
    risk: Vec<RiskSection>,
    news: Vec<NewsItem>,
    warnings: Vec<String>,
    generated_at: DateTime<Utc>,
}

async fn load_profile(ticker: &str, warnings: &mut Vec<String>) -> ProfileSection {
    match fundamentals::fetch_company_profile(ticker).await {
        Ok(profile) => ProfileSection::from_profile(profile),
        Err(e) => {
            warn!("Profile fetch failed for {}: {}", ticker, e);
            warnings.push(format!("Company data unavailable for {}", ticker));
            ProfileSection::from_profile(CompanyProfile::empty(ticker))
        }
    }
}

fn risk_section(
    series: &PriceSeries,
    period: Period,
    warnings: &mut Vec<String>,
) -> Option<RiskSection> {
    match analytics::risk_stats(series, RETURN_HISTOGRAM_BINS) {
        Ok(stats) => Some(RiskSection {
            symbol: series.symbol.clone(),
            period,
            stats,
        }),
        Err(e) => {
            warn!("Risk computation failed for {}: {}", series.symbol, e);
            warnings.push(format!(
                "Not enough data to compute volatility for {}",
                series.symbol
            ));
            None
        }
    }
}

/// One full render pass: validate inputs, fetch everything, compute the
/// derived metrics and return all dashboard sections. The primary ticker
/// halts the request when invalid; the comparison ticker and the news
/// section degrade to warnings.
pub async fn get_dashboard(
    query: DashboardQuery,
    store: Arc<HistoryStore>,
) -> Result<Json, Rejection> {
    let primary = normalize_ticker(&query.ticker)
        .ok_or_else(|| warp::reject::custom(ApiError::invalid_ticker(&query.ticker)))?;
    let period = match query.period.as_deref() {
        Some(raw) => parse_period(raw)?,
        None => Period::default(),
    };
    let style = parse_chart(query.chart.as_deref())?;
    info!(
        "Handling dashboard request: ticker={} compare={:?} period={}",
        primary, query.compare, period
    );

    if !yahoo::validate_ticker(&primary).await {
        return Err(warp::reject::custom(ApiError::invalid_ticker(&primary)));
    }

    let mut warnings = Vec::new();

    // Comparison ticker is best-effort from here on
    let mut secondary: Option<String> = None;
    if let Some(raw) = query
        .compare
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        match normalize_ticker(raw) {
            Some(ticker) => {
                if yahoo::validate_ticker(&ticker).await {
                    secondary = Some(ticker);
                } else {
                    warnings.push(format!("Invalid comparison ticker {}, ignoring", ticker));
                }
            }
            None => warnings.push(format!("Invalid comparison ticker {}, ignoring", raw)),
        }
    }

    // Primary history halts the whole render when missing
    let primary_series = load_history(&store, &primary, period).await?;

    let mut secondary_series = None;
    if let Some(ticker) = secondary.clone() {
        match load_history(&store, &ticker, period).await {
            Ok(series) => secondary_series = Some(series),
            Err(_) => {
                warnings.push(format!("Could not fetch price data for {}", ticker));
                secondary = None;
            }
        }
    }

    let mut companies = vec![load_profile(&primary, &mut warnings).await];
    if let Some(ticker) = &secondary {
        companies.push(load_profile(ticker, &mut warnings).await);
    }

    // Candles are drawn for the primary ticker only; the comparison
    // overlay exists on the line chart.
    let mut charts = vec![ChartSeries::from_series(&primary_series, style)];
    if style == ChartStyle::Line {
        if let Some(series) = &secondary_series {
            charts.push(ChartSeries::from_series(series, style));
        }
    }

    let (mut returns, mut returns_warnings) = returns_rows(&store, &primary).await;
    if let Some(ticker) = &secondary {
        let (rows, more) = returns_rows(&store, ticker).await;
        returns.extend(rows);
        returns_warnings.extend(more);
    }
    warnings.append(&mut returns_warnings);
    if returns.is_empty() {
        warnings.push("Could not compute annualized returns".to_string());
    }

    let mut risk = Vec::new();
    if let Some(section) = risk_section(&primary_series, period, &mut warnings) {
        risk.push(section);
    }
    if let Some(series) = &secondary_series {
        if let Some(section) = risk_section(series, period, &mut warnings) {
            risk.push(section);
        }
    }

    let news = match yahoo::fetch_news(&primary, NEWS_LIMIT).await {
        Ok(items) => {
            if items.is_empty() {
                warnings.push("No recent news available".to_string());
            }
            items
        }
        Err(e) => {
            warn!("Failed to fetch news for {}: {}", primary, e);
            warnings.push("Could not load news".to_string());
            Vec::new()
        }
    };

    Ok(warp::reply::json(&DashboardResponse {
        ticker: primary,
        compare: secondary,
        period,
        companies,
        charts,
        returns,
        returns_explanation: CAGR_EXPLANATION,
        risk,
        news,
        warnings,
        generated_at: Utc::now(),
    }))
}
