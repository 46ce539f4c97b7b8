//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Map container identifier
pub const DEFAULT_MAP_SURFACE_ID: &str = "locationMap";

/// Latitude field identifier
pub const DEFAULT_LAT_FIELD_ID: &str = "latitude";

/// Longitude field identifier
pub const DEFAULT_LNG_FIELD_ID: &str = "longitude";

/// Address field identifier
pub const DEFAULT_ADDRESS_FIELD_ID: &str = "address";

/// Default map center latitude (Riyadh)
pub const DEFAULT_CENTER_LAT: f64 = 24.7136;

/// Default map center longitude (Riyadh)
pub const DEFAULT_CENTER_LNG: f64 = 46.6753;

/// Zoom level of the initial map view
pub const DEFAULT_ZOOM: u8 = 10;

/// Zoom level used when focusing on a selected point
pub const DEFAULT_FOCUS_ZOOM: u8 = 15;

/// Shortest search input that issues a request
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// Delay before a search request is sent, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Country filter for forward searches (ISO 3166-1 alpha-2, comma separated)
pub const DEFAULT_COUNTRY_CODES: &str = "sa";

/// Maximum number of search candidates
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7879;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "loc-picker";
