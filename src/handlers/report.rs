// src/handlers/report.rs
use log::info;
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;

/// PDF export is a stub in the dashboard; it only reports its own status.
pub async fn post_report() -> Result<Json, Rejection> {
    info!("Report export requested");
    Ok(warp::reply::json(&json!({
        "status": "Export function in development"
    })))
}
