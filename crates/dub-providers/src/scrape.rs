//! Best-effort extraction of stream links from player pages.
//!
//! Many simple players leak the direct `.m3u8` or `.mp4` link into the page
//! markup or an inline script. Nothing here is guaranteed to find it.

use crate::error::ProviderError;
use crate::provider::EpisodeOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};

const SCRAPE_USER_AGENT: &str = "Mozilla/5.0 (compatible)";

static STREAM_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(https?://[^"'<>\s]+?\.(?:m3u8|mp4))(?:[^0-9a-zA-Z]|$)"#)
        .expect("stream url pattern is valid")
});

/// Find the best stream link in a page body.
///
/// The first `.m3u8` link wins outright. An `.mp4` link is only returned if
/// the whole body contains no `.m3u8` link; the first `.mp4` seen is used.
pub fn find_stream_url(body: &str) -> Option<String> {
    let mut first_mp4: Option<&str> = None;

    for captures in STREAM_URL.captures_iter(body) {
        let Some(found) = captures.get(1) else {
            continue;
        };
        let found = found.as_str();
        let lower = found.to_ascii_lowercase();

        if lower.ends_with(".m3u8") {
            return Some(found.to_string());
        }
        if first_mp4.is_none() && lower.ends_with(".mp4") {
            first_mp4 = Some(found);
        }
    }

    first_mp4.map(str::to_string)
}

/// Fetch `page_url` and look for a stream link in it
async fn fetch_stream_url(
    client: &Client,
    page_url: &str,
    options: &EpisodeOptions,
) -> Result<Option<String>, ProviderError> {
    let mut request = client
        .get(page_url)
        .header(reqwest::header::USER_AGENT, SCRAPE_USER_AGENT);
    for (name, value) in &options.headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            url: page_url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    Ok(find_stream_url(&body))
}

/// Scrape the page named in `options`, if any.
///
/// Returns `None` when there is no page, the fetch fails, or no link is
/// found; the caller moves on to the next resolution step.
pub async fn scrape_page(client: &Client, provider: &str, options: &EpisodeOptions) -> Option<String> {
    let page_url = options.page_url.as_deref()?;

    match fetch_stream_url(client, page_url, options).await {
        Ok(Some(url)) => {
            debug!(provider, page_url, stream_url = %url, "Scraped stream url from page");
            Some(url)
        }
        Ok(None) => {
            debug!(provider, page_url, "No stream url found in page");
            None
        }
        Err(e) => {
            warn!(provider, page_url, error = %e, "Page scrape failed");
            None
        }
    }
}
