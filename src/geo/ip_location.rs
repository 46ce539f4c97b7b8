//! IP-based device location
//!
//! Uses ip-api.com to approximate the device position, with file-based
//! caching so repeated requests don't hit the API.

use crate::config::defaults::APP_DIR_NAME;
use crate::constants::api::IP_API_URL;
use crate::constants::cache::{DEVICE_LOCATION_CACHE_FILE, DEVICE_LOCATION_TTL_SECS};
use crate::constants::notice::LOCATION_FAILED;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::DeviceLocator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, warn};

/// IP location service with caching
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

/// Cached position
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPosition {
    position: Coordinates,
    timestamp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl IpLocator {
    /// Create a new IP locator with default cache path
    pub fn new() -> Self {
        let cache_path =
            dirs::cache_dir().map(|p| p.join(APP_DIR_NAME).join(DEVICE_LOCATION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            url: IP_API_URL.to_string(),
            cache_path,
        }
    }

    /// Create an IP locator with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            cache_path: Some(cache_path),
            ..Self::without_cache()
        }
    }

    /// Create an IP locator without caching
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            url: IP_API_URL.to_string(),
            cache_path: None,
        }
    }

    /// Locate the device, preferring a fresh cached position
    pub async fn locate(&self) -> Result<Coordinates> {
        if let Some(cached) = self.load_cache() {
            debug!(%cached, "using cached device position");
            return Ok(cached);
        }

        let position = self.fetch_position().await?;
        self.save_cache(position);
        Ok(position)
    }

    /// Fetch position from ip-api.com
    async fn fetch_position(&self) -> Result<Coordinates> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse IP location response: {}", e)))?;

        Self::position_from(data)
    }

    fn position_from(data: IpApiResponse) -> Result<Coordinates> {
        if data.status != "success" {
            return Err(Error::Geocoding(format!(
                "IP location lookup failed: {}",
                data.message.unwrap_or_else(|| data.status.clone())
            )));
        }

        match (data.lat, data.lon) {
            (Some(lat), Some(lng)) => Coordinates::checked(lat, lng),
            _ => Err(Error::Geocoding("No coordinates in IP location response".to_string())),
        }
    }

    /// Load cached position if valid
    fn load_cache(&self) -> Option<Coordinates> {
        let cache_path = self.cache_path.as_ref()?;
        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedPosition = serde_json::from_str(&content).ok()?;

        if now_secs().saturating_sub(cached.timestamp) < DEVICE_LOCATION_TTL_SECS {
            Some(cached.position)
        } else {
            None
        }
    }

    /// Save position to cache
    fn save_cache(&self, position: Coordinates) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let cached = CachedPosition {
            position,
            timestamp: now_secs(),
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceLocator for IpLocator {
    async fn current_position(&self) -> Result<Coordinates> {
        self.locate().await.map_err(|e| {
            warn!(error = %e, "device location lookup failed");
            Error::LocationUnavailable(LOCATION_FAILED.to_string())
        })
    }
}
