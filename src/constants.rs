//! Centralized constants for the loc-picker crate
//!
//! Values shared by more than one module live here.

/// Coordinate formatting
pub mod coord {
    /// Decimal places written to the latitude/longitude fields
    pub const FIELD_PRECISION: usize = 6;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent to external services (Nominatim requires one)
    pub const USER_AGENT: &str = concat!("loc-picker/", env!("CARGO_PKG_VERSION"));
}

/// Cache settings
pub mod cache {
    /// Device location cache duration in seconds (1 hour)
    pub const DEVICE_LOCATION_TTL_SECS: u64 = 3600;

    /// Device location cache file name
    pub const DEVICE_LOCATION_CACHE_FILE: &str = "device_location_cache.json";
}

/// User-facing notices
pub mod notice {
    /// Shown when the device location lookup fails
    pub const LOCATION_FAILED: &str = "Unable to determine your current location";

    /// Shown when no device location service is available
    pub const LOCATION_UNSUPPORTED: &str = "Device location is not supported";

    /// Placeholder rendered for an empty search result list
    pub const NO_RESULTS: &str = "No results";
}
