use dotenv::dotenv;
use env_logger;
use equity_dashboard_api::models::Period;
use equity_dashboard_api::services::analytics;
use equity_dashboard_api::services::yahoo::fetch_price_history;
use log::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    info!("Testing Yahoo Finance history fetching...");

    match fetch_price_history("NVDA", Period::OneYear).await {
        Ok(series) => {
            info!("SUCCESS: fetched {} bars for NVDA", series.bars.len());
            let prices = series.closing_prices();
            if let (Some(first), Some(last)) = (prices.first(), prices.last()) {
                info!("First close: {:.2}, last close: {:.2}", first, last);
            }
            if let Some(r) = analytics::period_cagr(&series) {
                info!("1y CAGR: {:.2}%", r * 100.0);
            }
        }
        Err(e) => {
            error!("ERROR: Failed to fetch NVDA history: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
