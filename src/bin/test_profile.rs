use dotenv::dotenv;
use env_logger;
use equity_dashboard_api::services::fundamentals::fetch_company_profile;
use log::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    info!("Testing quoteSummary fundamentals fetching...");

    match fetch_company_profile("AAPL").await {
        Ok(profile) => {
            info!("SUCCESS: fetched profile for {}", profile.symbol);
            info!("Name: {:?}", profile.short_name);
            info!("Sector: {:?}", profile.sector);
            info!("Industry: {:?}", profile.industry);
            info!("Trailing P/E: {:?}", profile.trailing_pe);
            info!("Market cap: {:?}", profile.market_cap);
        }
        Err(e) => {
            error!("ERROR: Failed to fetch AAPL profile: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
