use thiserror::Error;

use needs_spec::ValidationIssue;

use crate::config::ConfigError;

/// Failures of a single collaborator call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("not authorized (status {status})")]
    Unauthorized { status: u16 },
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("response missing field '{0}'")]
    MissingField(&'static str),
}

impl ApiError {
    pub fn is_authorization(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Error taxonomy surfaced by the session driver.
#[derive(Debug, Error)]
pub enum NeedsError {
    #[error(transparent)]
    Validation(#[from] ValidationIssue),
    #[error("transport failure: {0}")]
    Transport(#[source] ApiError),
    #[error("authorization failed: {0}")]
    Authorization(#[source] ApiError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ApiError> for NeedsError {
    fn from(err: ApiError) -> Self {
        if err.is_authorization() {
            NeedsError::Authorization(err)
        } else {
            NeedsError::Transport(err)
        }
    }
}
