//! Server shared state
//!
//! Holds configuration and the controller every request drives.

use crate::config::Config;
use crate::fields::MemoryFields;
use crate::geo::{DeviceLocator, GeocodingClient};
use crate::map::headless::HeadlessMap;
use crate::picker::{LocationController, PickerOptions};

/// Controller type served over HTTP
pub type ServerController<G, D> = LocationController<HeadlessMap, G, MemoryFields, D>;

/// Shared state for the HTTP server
pub struct AppState<G, D> {
    /// Configuration
    pub config: Config,

    /// The picker all requests operate on
    pub controller: ServerController<G, D>,
}

impl<G, D> AppState<G, D>
where
    G: GeocodingClient + 'static,
    D: DeviceLocator + 'static,
{
    /// Create new application state
    ///
    /// Fields start empty; the map is headless and only reports its view.
    pub fn new(config: Config, geocoder: G, device: D) -> Self {
        let (map, _events) = HeadlessMap::new();
        let controller = LocationController::new(
            PickerOptions::from(&config),
            map,
            geocoder,
            MemoryFields::new(),
            device,
        );
        Self { config, controller }
    }
}
