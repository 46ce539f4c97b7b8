//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/loc-picker/config.toml

pub mod defaults;

use crate::constants::api::NOMINATIM_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Bound field and map container identifiers
    #[serde(default)]
    pub picker: PickerConfig,

    /// Initial map view
    #[serde(default)]
    pub map: MapConfig,

    /// Text search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Geocoding provider settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Device location settings
    #[serde(default)]
    pub device: DeviceConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Map link settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Bound field and map container identifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    #[serde(default = "default_map_surface_id")]
    pub map_surface_id: String,

    #[serde(default = "default_lat_field_id")]
    pub lat_field_id: String,

    #[serde(default = "default_lng_field_id")]
    pub lng_field_id: String,

    #[serde(default = "default_address_field_id")]
    pub address_field_id: String,
}

/// Initial map view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Latitude of the initial map center
    #[serde(default = "default_center_lat")]
    pub default_lat: f64,

    /// Longitude of the initial map center
    #[serde(default = "default_center_lng")]
    pub default_lng: f64,

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    /// Zoom level applied when a location is selected
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: u8,
}

/// Text search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Render the search control and issue search requests
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Shortest input that issues a request
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Country filter, empty for worldwide search
    #[serde(default = "default_country_codes")]
    pub country_codes: String,

    /// Maximum number of candidates
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of a Nominatim-compatible service
    #[serde(default = "default_geocoding_url")]
    pub base_url: String,
}

/// Device location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// If false, device location requests always fail as unsupported
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Map link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}
fn default_map_surface_id() -> String {
    DEFAULT_MAP_SURFACE_ID.to_string()
}
fn default_lat_field_id() -> String {
    DEFAULT_LAT_FIELD_ID.to_string()
}
fn default_lng_field_id() -> String {
    DEFAULT_LNG_FIELD_ID.to_string()
}
fn default_address_field_id() -> String {
    DEFAULT_ADDRESS_FIELD_ID.to_string()
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_focus_zoom() -> u8 {
    DEFAULT_FOCUS_ZOOM
}
fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_country_codes() -> String {
    DEFAULT_COUNTRY_CODES.to_string()
}
fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
fn default_geocoding_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},{zoom}z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map={zoom}/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}&z={zoom}".to_string(),
    );
    providers
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            map_surface_id: default_map_surface_id(),
            lat_field_id: default_lat_field_id(),
            lng_field_id: default_lng_field_id(),
            address_field_id: default_address_field_id(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_lat: default_center_lat(),
            default_lng: default_center_lng(),
            default_zoom: default_zoom(),
            focus_zoom: default_focus_zoom(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_query_len: default_min_query_len(),
            debounce_ms: default_debounce_ms(),
            country_codes: default_country_codes(),
            limit: default_search_limit(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_url(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(what: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Check values a hand-edited file can get wrong
    fn validate(&self) -> Result<()> {
        Coordinates::new(self.map.default_lat, self.map.default_lng)
            .validate()
            .map_err(|e| Error::Config(format!("Invalid map center: {}", e)))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["picker", "map_surface_id"] => Some(self.picker.map_surface_id.clone()),
            ["picker", "lat_field_id"] => Some(self.picker.lat_field_id.clone()),
            ["picker", "lng_field_id"] => Some(self.picker.lng_field_id.clone()),
            ["picker", "address_field_id"] => Some(self.picker.address_field_id.clone()),

            ["map", "default_lat"] => Some(self.map.default_lat.to_string()),
            ["map", "default_lng"] => Some(self.map.default_lng.to_string()),
            ["map", "default_zoom"] => Some(self.map.default_zoom.to_string()),
            ["map", "focus_zoom"] => Some(self.map.focus_zoom.to_string()),

            ["search", "enabled"] => Some(self.search.enabled.to_string()),
            ["search", "min_query_len"] => Some(self.search.min_query_len.to_string()),
            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "country_codes"] => Some(self.search.country_codes.clone()),
            ["search", "limit"] => Some(self.search.limit.to_string()),

            ["geocoding", "base_url"] => Some(self.geocoding.base_url.clone()),

            ["device", "enabled"] => Some(self.device.enabled.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["picker", "map_surface_id"] => self.picker.map_surface_id = value.to_string(),
            ["picker", "lat_field_id"] => self.picker.lat_field_id = value.to_string(),
            ["picker", "lng_field_id"] => self.picker.lng_field_id = value.to_string(),
            ["picker", "address_field_id"] => self.picker.address_field_id = value.to_string(),

            ["map", "default_lat"] => {
                let lat: f64 = parse_value("latitude", value)?;
                Coordinates::new(lat, self.map.default_lng)
                    .validate()
                    .map_err(|e| Error::Config(e.to_string()))?;
                self.map.default_lat = lat;
            }
            ["map", "default_lng"] => {
                let lng: f64 = parse_value("longitude", value)?;
                Coordinates::new(self.map.default_lat, lng)
                    .validate()
                    .map_err(|e| Error::Config(e.to_string()))?;
                self.map.default_lng = lng;
            }
            ["map", "default_zoom"] => self.map.default_zoom = parse_value("zoom", value)?,
            ["map", "focus_zoom"] => self.map.focus_zoom = parse_value("zoom", value)?,

            ["search", "enabled"] => self.search.enabled = parse_value("boolean", value)?,
            ["search", "min_query_len"] => {
                self.search.min_query_len = parse_value("length", value)?
            }
            ["search", "debounce_ms"] => self.search.debounce_ms = parse_value("delay", value)?,
            ["search", "country_codes"] => self.search.country_codes = value.to_string(),
            ["search", "limit"] => self.search.limit = parse_value("limit", value)?,

            ["geocoding", "base_url"] => {
                self.geocoding.base_url = value.trim_end_matches('/').to_string()
            }

            ["device", "enabled"] => self.device.enabled = parse_value("boolean", value)?,

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value("port", value)?,

            ["url", "default"] => self.url.default = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "picker.map_surface_id",
            "picker.lat_field_id",
            "picker.lng_field_id",
            "picker.address_field_id",
            "map.default_lat",
            "map.default_lng",
            "map.default_zoom",
            "map.focus_zoom",
            "search.enabled",
            "search.min_query_len",
            "search.debounce_ms",
            "search.country_codes",
            "search.limit",
            "geocoding.base_url",
            "device.enabled",
            "server.host",
            "server.port",
            "url.default",
        ]
    }

    /// Format a map link using the specified provider
    ///
    /// Replaces {lat}, {lng} and {zoom} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64, zoom: u8) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string())
            .replace("{zoom}", &zoom.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
