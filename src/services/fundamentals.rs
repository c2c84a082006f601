// src/services/fundamentals.rs
use log::{error, info};
use reqwest::Client;
use serde_json::Value;

use crate::models::CompanyProfile;
use crate::BoxError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

fn opt_str(v: &Value, pointer: &str) -> Option<String> {
    v.pointer(pointer)
        .and_then(|x| x.as_str())
        .map(|s| s.to_string())
}

fn opt_f64(v: &Value, pointer: &str) -> Option<f64> {
    v.pointer(pointer).and_then(|x| x.as_f64())
}

/// Fetch company metadata and key fundamentals from the quoteSummary
/// endpoint. Fields the provider omits stay `None`.
pub async fn fetch_company_profile(symbol: &str) -> Result<CompanyProfile, BoxError> {
    let url = format!(
        "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=assetProfile,price,summaryDetail",
        symbol
    );
    info!("Fetching fundamentals from URL: {}", url);

    let client = Client::builder().user_agent(USER_AGENT).build()?;
    let body: Value = client.get(&url).send().await?.json().await?;

    if let Some(err) = body.pointer("/quoteSummary/error") {
        if !err.is_null() {
            error!("quoteSummary error for {}: {}", symbol, err);
            return Err(format!("Provider rejected symbol {}", symbol).into());
        }
    }

    let result = body
        .pointer("/quoteSummary/result/0")
        .ok_or_else(|| format!("No quoteSummary result for {}", symbol))?;

    // Yahoo wraps numeric fields as {"raw": ..., "fmt": ...}
    let current_price = opt_f64(result, "/price/regularMarketPrice/raw")
        .or_else(|| opt_f64(result, "/price/currentPrice/raw"));
    let previous_close = opt_f64(result, "/price/regularMarketPreviousClose/raw")
        .or_else(|| opt_f64(result, "/summaryDetail/previousClose/raw"));

    Ok(CompanyProfile {
        symbol: symbol.to_string(),
        short_name: opt_str(result, "/price/shortName"),
        sector: opt_str(result, "/assetProfile/sector"),
        industry: opt_str(result, "/assetProfile/industry"),
        country: opt_str(result, "/assetProfile/country"),
        long_business_summary: opt_str(result, "/assetProfile/longBusinessSummary"),
        current_price,
        previous_close,
        market_cap: opt_f64(result, "/price/marketCap/raw"),
        trailing_pe: opt_f64(result, "/summaryDetail/trailingPE/raw"),
        dividend_yield: opt_f64(result, "/summaryDetail/dividendYield/raw"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_helpers_tolerate_missing_fields() {
        let v = json!({"price": {"shortName": "NVIDIA Corporation"}});
        assert_eq!(
            opt_str(&v, "/price/shortName"),
            Some("NVIDIA Corporation".to_string())
        );
        assert_eq!(opt_str(&v, "/assetProfile/sector"), None);
        assert_eq!(opt_f64(&v, "/summaryDetail/trailingPE/raw"), None);
    }

    #[test]
    fn raw_wrapped_numbers_parse() {
        let v = json!({"summaryDetail": {"trailingPE": {"raw": 65.4, "fmt": "65.40"}}});
        assert_eq!(opt_f64(&v, "/summaryDetail/trailingPE/raw"), Some(65.4));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_company_profile() {
        let profile = fetch_company_profile("AAPL").await.unwrap();
        assert_eq!(profile.symbol, "AAPL");
        assert!(profile.short_name.is_some());
    }
}
