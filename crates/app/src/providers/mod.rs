//! HTTP data providers. Each provider fetches raw payloads and
//! normalizes them into the render model; network and payload
//! failures stay inside the provider and surface as absent data.

pub mod airnow;
pub mod pollen;
pub mod weather;

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no pollen bulletin published for any candidate date")]
    BulletinMissing,
    #[error("bulletin page carried no recognizable counts")]
    UnexpectedPage,
}

pub(crate) fn http_client() -> Result<reqwest::blocking::Client, ProviderError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(20))
        .build()?)
}
