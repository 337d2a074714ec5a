use thiserror::Error;

/// The widget and the results page treat every retrieval failure the
/// same way: log it and leave the rendered state alone. The variants
/// only exist to make the diagnostics readable.
#[derive(Debug, Error, Clone)]
pub enum AppError {
    /// The endpoint answered, but not with a success status.
    #[error("HTTP status {0}")]
    Status(u16),
    /// Transport failure, or a response body of the wrong shape.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

#[cfg(not(feature = "ssr"))]
impl From<gloo_net::Error> for AppError {
    fn from(value: gloo_net::Error) -> Self {
        Self::Fetch(value.to_string())
    }
}

#[cfg(feature = "ssr")]
impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::Fetch(value.to_string())
    }
}

pub(crate) type AppResult<T> = Result<T, AppError>;
