//! Google Maps Platform client
//!
//! Thin async wrapper around the Geocoding and Places web services. Every
//! request is bounded by the configured timeout; provider status codes are
//! mapped onto [`HotelFinderError`] so callers can degrade to fallbacks.

pub mod geocoding;
pub mod places;

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::HotelFinderConfig;
use crate::{HotelFinderError, Result};

/// Async client for the Google geocoding and places endpoints
#[derive(Clone)]
pub struct GoogleClient {
    client: Client,
    api_key: String,
    geocoding_url: String,
    places_url: String,
    region: Option<String>,
}

impl std::fmt::Debug for GoogleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleClient")
            .field("geocoding_url", &self.geocoding_url)
            .field("places_url", &self.places_url)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl GoogleClient {
    /// Build a client from configuration; fails when no API key is configured
    pub fn new(config: &HotelFinderConfig) -> Result<Self> {
        let api_key = config
            .google_api_key()
            .ok_or_else(|| HotelFinderError::config("Google API key not found"))?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds.into()))
            .user_agent(config.http.user_agent.clone())
            .build()
            .map_err(|e| HotelFinderError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            geocoding_url: config.google.geocoding_url.trim_end_matches('/').to_string(),
            places_url: config.google.places_url.trim_end_matches('/').to_string(),
            region: config.google.region.clone(),
        })
    }

    fn key_param(&self) -> String {
        format!("key={}", urlencoding::encode(&self.api_key))
    }

    /// GET a Google JSON endpoint and check its `status` field
    #[instrument(skip(self, url), fields(endpoint = %url.split('?').next().unwrap_or_default()))]
    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned + HasStatus,
    {
        let start_time = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();

        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            warn!("Google API request failed with status {}", status);
            return Err(match status.as_u16() {
                401 | 403 => HotelFinderError::config(format!(
                    "Google API rejected the credentials (HTTP {status})"
                )),
                404 => HotelFinderError::not_found(format!("Google API returned HTTP {status}")),
                _ => HotelFinderError::network(format!(
                    "Google API request failed with status: {} - {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown error")
                )),
            });
        }

        let body: T = response.json().await?;
        check_status(body.status(), body.error_message())?;
        Ok(body)
    }
}

/// Google responses carry a textual status next to the HTTP status
pub(crate) trait HasStatus {
    fn status(&self) -> &str;
    fn error_message(&self) -> Option<&str>;
}

/// Map a Google `status` value to an error; `ZERO_RESULTS` is not an error here
pub(crate) fn check_status(status: &str, error_message: Option<&str>) -> Result<()> {
    let detail = error_message.unwrap_or("no details");
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "NOT_FOUND" => Err(HotelFinderError::not_found(detail.to_string())),
        "REQUEST_DENIED" => Err(HotelFinderError::config(format!(
            "Google API denied the request: {detail}"
        ))),
        "UNKNOWN_ERROR" => Err(HotelFinderError::network(format!(
            "Google API server error: {detail}"
        ))),
        other => Err(HotelFinderError::api(format!("Google API status {other}: {detail}"))),
    }
}
