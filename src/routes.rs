// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;

use crate::handlers::{
    dashboard::{get_dashboard, DashboardQuery},
    history::{get_history, HistoryQuery},
    news::get_news,
    profile::get_profile,
    report::post_report,
    returns::get_returns,
    risk::get_risk,
};
use crate::services::store::HistoryStore;
use log::info;

use crate::handlers::error::{ApiError, ErrorKind};
use std::convert::Infallible;
use warp::{Filter, Reply};

// Map our custom rejections onto JSON error bodies
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = match api_error.kind {
            ErrorKind::InvalidRequest => warp::http::StatusCode::BAD_REQUEST,
            ErrorKind::NoData => warp::http::StatusCode::NOT_FOUND,
            ErrorKind::External => warp::http::StatusCode::BAD_GATEWAY,
        };
        message = api_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    store: Arc<HistoryStore>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let store_filter = warp::any().map(move || store.clone());

    let dashboard_route = warp::path!("api" / "v1" / "dashboard")
        .and(warp::get())
        .and(warp::query::<DashboardQuery>())
        .and(store_filter.clone())
        .and_then(get_dashboard);

    let profile_route = warp::path!("api" / "v1" / "ticker" / String / "profile")
        .and(warp::get())
        .and_then(get_profile);

    let history_route = warp::path!("api" / "v1" / "ticker" / String / "history" / String)
        .and(warp::get())
        .and(warp::query::<HistoryQuery>())
        .and(store_filter.clone())
        .and_then(get_history);

    let returns_route = warp::path!("api" / "v1" / "ticker" / String / "returns")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_returns);

    let risk_route = warp::path!("api" / "v1" / "ticker" / String / "risk" / String)
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_risk);

    let news_route = warp::path!("api" / "v1" / "ticker" / String / "news")
        .and(warp::get())
        .and_then(get_news);

    let report_route = warp::path!("api" / "v1" / "report")
        .and(warp::post())
        .and_then(post_report);

    info!("All routes configured successfully.");

    dashboard_route
        .or(profile_route)
        .or(history_route)
        .or(returns_route)
        .or(risk_route)
        .or(news_route)
        .or(report_route)
        .recover(handle_rejection)
}
