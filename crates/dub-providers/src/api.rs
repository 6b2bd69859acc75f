//! JSON calls against provider APIs.

use crate::error::ProviderError;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

/// `{"url": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct EpisodeUrlBody {
    url: Option<String>,
}

impl EpisodeUrlBody {
    pub(crate) fn into_url(self) -> Result<String, ProviderError> {
        self.url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ProviderError::MissingField("url"))
    }
}

/// `{"qualities": [...]}`
#[derive(Debug, Deserialize)]
pub(crate) struct QualitiesBody {
    qualities: Option<Vec<String>>,
}

impl QualitiesBody {
    pub(crate) fn into_qualities(self) -> Result<Vec<String>, ProviderError> {
        self.qualities
            .filter(|qualities| !qualities.is_empty())
            .ok_or(ProviderError::MissingField("qualities"))
    }
}

/// GET `url` and decode a JSON body, treating any non-2xx status as an error
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, ProviderError> {
    debug!(url = %url, "Requesting provider API");

    let response = client.get(url).query(query).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.json::<T>().await?)
}
