//! Nominatim geocoder implementing [`Geocoder`].
//!
//! Resolves a free-form city name with
//! `GET {base}/search?q=<city>&format=json&limit=1`. Nominatim reports
//! coordinates and the bounding box as decimal strings; the box is ordered
//! `[south, north, west, east]`.

use std::time::Duration;

use citywalk_core::{BoundingBox, CityLocation, GeocodeError, GeocodedCity, Geocoder};
use serde::Deserialize;
use url::Url;

use crate::http::{HttpBridge, parse_endpoint};
use crate::{ClientBuildError, DEFAULT_USER_AGENT, RetryPolicy, TransportError};

/// Public Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim instance.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string; public instances reject anonymous clients.
    pub user_agent: String,
    /// Retry behaviour for failed requests.
    pub retry: RetryPolicy,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

impl NominatimConfig {
    /// Configuration for the given instance.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[derive(Debug, Deserialize)]
struct PlaceDto {
    lat: String,
    lon: String,
    boundingbox: Vec<String>,
}

impl PlaceDto {
    fn into_city(self, city: &str) -> Result<GeocodedCity, GeocodeError> {
        let invalid = |message: String| GeocodeError::InvalidResponse {
            city: city.to_owned(),
            message,
        };
        let number = |field: &str, raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|err| invalid(format!("{field} '{raw}': {err}")))
        };

        let center = CityLocation::new(
            number("lat", self.lat.as_str())?,
            number("lon", self.lon.as_str())?,
        );
        if !center.is_valid() {
            return Err(invalid(format!(
                "center ({}, {}) is out of range",
                center.lat, center.lon
            )));
        }
        let [south, north, west, east] = self.boundingbox.as_slice() else {
            return Err(invalid(format!(
                "expected 4 bounding box edges, got {}",
                self.boundingbox.len()
            )));
        };
        let bbox = BoundingBox::new(
            number("south", south.as_str())?,
            number("north", north.as_str())?,
            number("west", west.as_str())?,
            number("east", east.as_str())?,
        )
        .map_err(|err| invalid(err.to_string()))?;
        Ok(GeocodedCity { center, bbox })
    }
}

/// Blocking Nominatim client.
#[derive(Debug)]
pub struct NominatimGeocoder {
    http: HttpBridge,
    search_url: Url,
    retry: RetryPolicy,
}

impl NominatimGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the URL is invalid or the HTTP
    /// client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// As for [`NominatimGeocoder::new`].
    pub fn with_config(config: NominatimConfig) -> Result<Self, ClientBuildError> {
        let search_url = parse_endpoint(&format!(
            "{}/search",
            config.base_url.trim_end_matches('/')
        ))?;
        let http = HttpBridge::new(&config.user_agent, config.timeout)?;
        Ok(Self {
            http,
            search_url,
            retry: config.retry,
        })
    }

    fn build_search_url(&self, city: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", city)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, city: &str) -> Result<GeocodedCity, GeocodeError> {
        let url = self.build_search_url(city);
        log::debug!("geocoding '{city}' via {url}");
        let places: Vec<PlaceDto> = self
            .http
            .block_on(self.retry.run("geocode", || self.http.get_json(&url)))
            .map_err(|err| match err {
                TransportError::Decode { message, .. } => GeocodeError::InvalidResponse {
                    city: city.to_owned(),
                    message,
                },
                other => GeocodeError::Transport {
                    city: city.to_owned(),
                    message: other.to_string(),
                },
            })?;
        let place = places.into_iter().next().ok_or_else(|| GeocodeError::NotFound {
            city: city.to_owned(),
        })?;
        place.into_city(city)
    }
}
