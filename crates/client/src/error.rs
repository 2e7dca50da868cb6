use thiserror::Error;

/// Errors raised while setting up an [`ApiClient`](crate::ApiClient).
///
/// Call failures are never reported here; they travel as
/// [`ApiResult`](crate::ApiResult).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    #[error("invalid access token: {0}")]
    AccessToken(#[from] reqwest::header::InvalidHeaderValue),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}
