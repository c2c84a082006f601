// src/handlers/profile.rs
use log::{error, info};
use serde::Serialize;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{normalize_ticker, CompanyProfile};
use crate::services::{analytics, fundamentals};

/// Company panel plus the key-metric widgets derived from it.
#[derive(Debug, Serialize)]
pub struct ProfileSection {
    #[serde(flatten)]
    pub profile: CompanyProfile,
    /// Current price vs previous close, in percent.
    pub price_change_pct: Option<f64>,
}

impl ProfileSection {
    pub fn from_profile(profile: CompanyProfile) -> Self {
        let price_change_pct = match (profile.current_price, profile.previous_close) {
            (Some(current), Some(prev)) => analytics::percent_change(current, prev),
            _ => None,
        };
        ProfileSection {
            profile,
            price_change_pct,
        }
    }
}

pub async fn get_profile(symbol: String) -> Result<Json, Rejection> {
    let ticker = normalize_ticker(&symbol)
        .ok_or_else(|| warp::reject::custom(ApiError::invalid_ticker(&symbol)))?;
    info!("Handling request for {} profile", ticker);

    match fundamentals::fetch_company_profile(&ticker).await {
        Ok(profile) => Ok(warp::reply::json(&ProfileSection::from_profile(profile))),
        Err(e) => {
            error!("Failed to fetch profile for {}: {}", ticker, e);
            Err(warp::reject::custom(ApiError::external_error(format!(
                "Failed to fetch company data for {}",
                ticker
            ))))
        }
    }
}
