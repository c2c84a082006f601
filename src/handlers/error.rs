// src/handlers/error.rs
use std::fmt;
use warp::reject::Reject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The primary ticker (or a request parameter) is unusable; 400.
    InvalidRequest,
    /// The provider returned nothing usable for the primary ticker; 404.
    NoData,
    /// Upstream provider failure; 502.
    External,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub kind: ErrorKind,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            kind: ErrorKind::External,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            kind: ErrorKind::InvalidRequest,
        }
    }

    pub fn invalid_ticker(ticker: &str) -> Self {
        Self::invalid_request(format!("Invalid ticker {}, please check", ticker))
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            kind: ErrorKind::NoData,
        }
    }

    pub fn external_error(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            kind: ErrorKind::External,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
