//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for forward search and reverse geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::constants::api::USER_AGENT;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{Candidate, GeocodingClient};
use serde::Deserialize;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct SearchItem {
    lat: String,
    lon: String,
    display_name: String,
}

/// Nominatim reverse response
///
/// Points without an address come back as `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

impl NominatimBackend {
    /// Create a backend for a Nominatim-compatible service
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the forward search URL
    fn search_url(&self, query: &str, country_filter: Option<&str>, limit: usize) -> String {
        let mut url = format!(
            "{}/search?format=json&q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        if let Some(countries) = country_filter.filter(|c| !c.is_empty()) {
            url.push_str("&countrycodes=");
            url.push_str(&urlencoding::encode(countries));
        }
        url
    }

    /// Build the reverse geocode URL
    fn reverse_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, coords.lat, coords.lng
        )
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lng)))?;
        Ok((lat, lng))
    }

    fn to_candidates(items: Vec<SearchItem>) -> Result<Vec<Candidate>> {
        items
            .into_iter()
            .map(|item| {
                let (lat, lng) = Self::parse_coords(&item.lat, &item.lon)?;
                Ok(Candidate::new(lat, lng, item.display_name))
            })
            .collect()
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))
    }
}

impl GeocodingClient for NominatimBackend {
    async fn forward_search(
        &self,
        query: &str,
        country_filter: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Candidate>> {
        let url = self.search_url(query, country_filter, limit);
        debug!(%url, "forward search");

        let items: Vec<SearchItem> = self.get_json(&url).await?;
        Self::to_candidates(items)
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Option<String>> {
        let url = self.reverse_url(coords);
        debug!(%url, "reverse geocode");

        let response: ReverseResponse = self.get_json(&url).await?;
        if let Some(reason) = response.error {
            debug!(%reason, "no address for point");
        }
        Ok(response.display_name.filter(|name| !name.is_empty()))
    }
}
