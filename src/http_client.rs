use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use tracing::debug;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. The first caller's timeout wins for the process.
pub fn http_client_with_timeout(timeout_secs: u64) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .user_agent(concat!("audl_cache/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")
    })
}

/// GET `url` and return the body; non-2xx statuses are errors.
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("request failed: {url}"))?
        .error_for_status()
        .with_context(|| format!("bad status from {url}"))?;
    let body = resp.text().context("failed reading body")?;
    debug!(url, bytes = body.len(), "fetched");
    Ok(body)
}
