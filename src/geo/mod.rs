//! Geocoding and device location
//!
//! Capability traits for the external services the picker talks to, plus
//! their network-backed implementations:
//! - `GeocodingClient`: forward search and reverse geocode (Nominatim)
//! - `DeviceLocator`: the device's current position (IP geolocation)

pub mod ip_location;
pub mod nominatim;

use crate::config::Config;
use crate::constants::notice::LOCATION_UNSUPPORTED;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A forward search candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (address or description)
    pub display_name: String,
}

impl Candidate {
    pub fn new(lat: f64, lng: f64, display_name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            display_name: display_name.into(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Trait for geocoding backends
pub trait GeocodingClient: Send + Sync {
    /// Search for locations matching free text
    ///
    /// `country_filter` restricts results to a comma separated list of
    /// country codes. At most `limit` candidates are returned.
    fn forward_search(
        &self,
        query: &str,
        country_filter: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candidate>>> + Send;

    /// Reverse geocode coordinates to an address
    ///
    /// Returns None when the service knows no address for the point.
    fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Trait for device location services
pub trait DeviceLocator: Send + Sync {
    /// Current position of the device
    ///
    /// Fails with `Error::LocationUnavailable` when the position cannot be
    /// determined or the service is not supported.
    fn current_position(&self) -> impl Future<Output = Result<Coordinates>> + Send;
}

/// Device location source selected by configuration
#[derive(Debug)]
pub enum DeviceSource {
    /// IP-based geolocation
    Ip(ip_location::IpLocator),
    /// No location service; every request fails
    Unsupported,
}

impl DeviceSource {
    pub fn from_config(config: &Config) -> Self {
        if config.device.enabled {
            Self::Ip(ip_location::IpLocator::new())
        } else {
            Self::Unsupported
        }
    }
}

impl DeviceLocator for DeviceSource {
    async fn current_position(&self) -> Result<Coordinates> {
        match self {
            Self::Ip(locator) => locator.current_position().await,
            Self::Unsupported => Err(Error::LocationUnavailable(LOCATION_UNSUPPORTED.to_string())),
        }
    }
}

/// Get the geocoding backend for a configuration
pub fn get_geocoder(config: &Config) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::with_base_url(&config.geocoding.base_url)
}
