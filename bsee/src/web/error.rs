use thiserror::Error;

/// Failures that can keep the web server from starting. Request-time
/// search failures never surface here: the search service logs them
/// and answers with an empty result set instead.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Leptos config error {0}")]
    LeptosConfig(#[from] leptos::config::errors::LeptosConfigError),
    #[error("IO error {0}")]
    Io(#[from] std::io::Error),
}
