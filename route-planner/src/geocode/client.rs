//! Nominatim HTTP client.
//!
//! Blocking client for the Nominatim search endpoint. Honors the service's
//! usage policy by spacing consecutive requests at least one second apart;
//! the wait happens on the caller's thread.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::AddressRecord;

use super::Geocoder;
use super::types::NominatimPlace;

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// User-Agent sent with every request, as the usage policy requires.
const USER_AGENT: &str = "route-planner/0.1 (address graph tool)";

/// Minimum spacing between consecutive outbound requests.
const MIN_REQUEST_SPACING: Duration = Duration::from_secs(1);

/// Errors from the Nominatim HTTP client.
///
/// These never escape [`Geocoder::lookup`]; they exist so the transport
/// layer can be tested and logged precisely.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, …).
    #[error("geocode request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("geocode API returned status {status}")]
    Api { status: u16 },
}

/// Simple leaky-bucket-of-one request spacer.
///
/// Owns the timestamp of the last outbound request; there is no
/// process-wide state. `wait` sleeps out whatever remains of the minimum
/// interval, `stamp` records a request as sent.
#[derive(Debug)]
pub(crate) struct RequestSpacer {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RequestSpacer {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    pub(crate) fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
    }

    pub(crate) fn stamp(&mut self) {
        self.last_request = Some(Instant::now());
    }
}

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API (defaults to the public instance).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl NominatimConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Blocking Nominatim search client.
pub struct NominatimClient {
    http: reqwest::blocking::Client,
    base_url: String,
    spacer: RequestSpacer,
}

impl NominatimClient {
    /// Creates a client from the given configuration.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            spacer: RequestSpacer::new(MIN_REQUEST_SPACING),
        })
    }

    /// Issues a single best-match search request.
    fn search(&mut self, query: &str) -> Result<Vec<NominatimPlace>, GeocodeError> {
        self.spacer.wait();

        let url = format!("{}/search", self.base_url);
        let result = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send();
        self.spacer.stamp();

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Api {
                status: status.as_u16(),
            });
        }

        Ok(response.json()?)
    }
}

impl Geocoder for NominatimClient {
    fn lookup(&mut self, query: &str) -> Option<AddressRecord> {
        debug!(query, "geocoding address");

        let places = match self.search(query) {
            Ok(places) => places,
            Err(error) => {
                warn!(query, %error, "geocode request failed, treating as no match");
                return None;
            }
        };

        let place = places.into_iter().next()?;
        match place.into_record() {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(query, %error, "geocode result unusable, treating as no match");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = NominatimConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_with_base_url() {
        let config = NominatimConfig::default().with_base_url("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_creation() {
        assert!(NominatimClient::new(NominatimConfig::default()).is_ok());
    }

    #[test]
    fn unreachable_host_is_no_match() {
        // Port 9 (discard) refuses connections; the failure must surface
        // as "no match", not an error.
        let config = NominatimConfig::default()
            .with_base_url("http://127.0.0.1:9");
        let mut client = NominatimClient::new(config).unwrap();

        assert!(client.lookup("anywhere").is_none());
    }

    #[test]
    fn spacer_enforces_minimum_interval() {
        let mut spacer = RequestSpacer::new(Duration::from_millis(50));

        // First request goes through immediately.
        let start = Instant::now();
        spacer.wait();
        spacer.stamp();
        assert!(start.elapsed() < Duration::from_millis(40));

        // Second request waits out the remainder of the interval.
        let start = Instant::now();
        spacer.wait();
        spacer.stamp();
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn spacer_does_not_wait_after_interval_passed() {
        let mut spacer = RequestSpacer::new(Duration::from_millis(10));
        spacer.stamp();
        thread::sleep(Duration::from_millis(20));

        let start = Instant::now();
        spacer.wait();
        assert!(start.elapsed() < Duration::from_millis(10));
    }
}
