//! Error type shared by every client operation.
//!
//! All failures surface as one [`ApiError`] with three kinds:
//! - `Validation`: caller input rejected before any network access
//! - `Authentication`: a token endpoint answered without a token
//! - `Request`: transport failure, non-2xx status, unreadable body or an empty result

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Request error: {0}")]
    Request(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn request(msg: impl Into<String>) -> Self {
        ApiError::Request(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }

    pub fn is_request(&self) -> bool {
        matches!(self, ApiError::Request(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Request(format!("Request failed: {}", err))
    }
}
