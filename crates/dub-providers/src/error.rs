use thiserror::Error;

/// Failure talking to a provider upstream.
///
/// These never reach the provider's caller: every provider turns them into
/// the default quality list or the fallback URL.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}
