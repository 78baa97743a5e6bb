//! Overpass API client implementing [`PoiSource`].
//!
//! Queries are posted as raw Overpass QL to the interpreter endpoint. Each
//! request is retried according to the configured [`RetryPolicy`]; once the
//! attempts are exhausted the [`PoiSource`] methods log the failure and
//! return an empty result, so the planner degrades to a shorter walk rather
//! than failing.
//!
//! # Example
//!
//! ```no_run
//! use citywalk_core::{BoundingBox, PoiSource};
//! use citywalk_data::{OverpassClient, OverpassConfig};
//!
//! let client = OverpassClient::with_config(OverpassConfig::default())?;
//! let bbox = BoundingBox::new(48.81, 48.90, 2.22, 2.47)?;
//! let pois = client.fetch_pois(&bbox);
//! println!("found {} points of interest", pois.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod dto;
pub mod query;
pub mod tags;

use std::time::Duration;

use citywalk_core::geometry::distance_km;
use citywalk_core::{BoundingBox, CityLocation, Poi, PoiSource};
use url::Url;

use self::dto::OverpassResponseDto;
use crate::http::{HttpBridge, parse_endpoint};
use crate::{ClientBuildError, DEFAULT_USER_AGENT, RetryPolicy, TransportError};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default client-side request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`OverpassClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassConfig {
    /// Interpreter endpoint URL.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Retry behaviour for failed requests.
    pub retry: RetryPolicy,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OVERPASS_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

impl OverpassConfig {
    /// Configuration for the given interpreter endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
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

/// Blocking Overpass client.
#[derive(Debug)]
pub struct OverpassClient {
    http: HttpBridge,
    endpoint: Url,
    retry: RetryPolicy,
}

impl OverpassClient {
    /// Create a client for `endpoint` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the endpoint is not a URL or the
    /// HTTP client fails to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(OverpassConfig::new(endpoint))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// As for [`OverpassClient::new`].
    pub fn with_config(config: OverpassConfig) -> Result<Self, ClientBuildError> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let http = HttpBridge::new(&config.user_agent, config.timeout)?;
        Ok(Self {
            http,
            endpoint,
            retry: config.retry,
        })
    }

    /// Fetch every named, categorised POI in `bbox`.
    ///
    /// # Errors
    ///
    /// Returns the last [`TransportError`] once retries are exhausted.
    pub fn query_pois(&self, bbox: &BoundingBox) -> Result<Vec<Poi>, TransportError> {
        self.execute("poi query", &query::pois_query(bbox))
            .map(OverpassResponseDto::into_pois)
    }

    /// Fetch every named railway station in `bbox`.
    ///
    /// # Errors
    ///
    /// Returns the last [`TransportError`] once retries are exhausted.
    pub fn query_stations(&self, bbox: &BoundingBox) -> Result<Vec<Poi>, TransportError> {
        self.execute("station query", &query::station_query(bbox))
            .map(OverpassResponseDto::into_stations)
    }

    fn execute(&self, label: &str, query: &str) -> Result<OverpassResponseDto, TransportError> {
        log::debug!("posting Overpass {label} to {}", self.endpoint);
        self.http.block_on(self.retry.run(label, || {
            self.http.post_json(&self.endpoint, query.to_owned())
        }))
    }
}

/// The station in `stations` closest to `city_center`.
///
/// Ties go to the earliest station.
#[must_use]
pub fn nearest_station(stations: Vec<Poi>, city_center: CityLocation) -> Option<Poi> {
    stations.into_iter().min_by(|lhs, rhs| {
        distance_km(city_center, lhs.location()).total_cmp(&distance_km(city_center, rhs.location()))
    })
}

impl PoiSource for OverpassClient {
    fn fetch_station(&self, bbox: &BoundingBox, city_center: CityLocation) -> Option<Poi> {
        match self.query_stations(bbox) {
            Ok(stations) => {
                let station = nearest_station(stations, city_center);
                if let Some(found) = &station {
                    log::info!("starting at station {}", found.name());
                }
                station
            }
            Err(err) => {
                log::warn!("station lookup failed, starting at city center: {err}");
                None
            }
        }
    }

    fn fetch_pois(&self, bbox: &BoundingBox) -> Vec<Poi> {
        self.query_pois(bbox).unwrap_or_else(|err| {
            log::warn!("POI lookup failed, planning without candidates: {err}");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citywalk_core::PoiCategory;
    use rstest::rstest;

    fn station(id: i64, lat: f64) -> Poi {
        Poi::new(id, lat, 0.0, format!("Station {id}"), PoiCategory::Other).expect("valid poi")
    }

    #[rstest]
    fn nearest_station_prefers_closest() {
        let stations = vec![station(1, 0.05), station(2, 0.01), station(3, -0.02)];
        let nearest = nearest_station(stations, CityLocation::new(0.0, 0.0));
        assert_eq!(nearest.map(|poi| poi.id()), Some(2));
    }

    #[rstest]
    fn nearest_station_of_none_is_none() {
        assert!(nearest_station(Vec::new(), CityLocation::new(0.0, 0.0)).is_none());
    }

    #[rstest]
    fn rejects_invalid_endpoint() {
        let err = OverpassClient::new("not a url").expect_err("invalid endpoint");
        assert!(matches!(err, ClientBuildError::InvalidUrl { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = OverpassConfig::new("http://overpass.local/api/interpreter")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_retry(RetryPolicy::immediate(1));
        assert_eq!(config.endpoint, "http://overpass.local/api/interpreter");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.retry.max_attempts, 1);
    }
}
