//! Map surface capability
//!
//! The picker never renders anything itself. It drives a `MapSurface`
//! (create the view, place or remove the single marker, recenter, host
//! controls, show notices) and consumes the `MapEvent`s the surface emits.

pub mod headless;

use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};

/// Custom controls the picker adds to the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapControl {
    /// Button that requests the device location
    Locate,
    /// Free-text search box with its result list
    Search,
}

/// Interaction events emitted by a map surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    /// The map was clicked
    Click { lat: f64, lng: f64 },
    /// The marker was dropped after a drag
    MarkerDragEnd { lat: f64, lng: f64 },
    /// The locate control was pressed
    LocateRequested,
}

impl MapEvent {
    /// Coordinate carried by the event, if any
    pub fn coordinates(&self) -> Option<Coordinates> {
        match *self {
            Self::Click { lat, lng } | Self::MarkerDragEnd { lat, lng } => {
                Some(Coordinates::new(lat, lng))
            }
            Self::LocateRequested => None,
        }
    }
}

/// Rendering side of an interactive map
///
/// A surface owns at most one marker. Events flow the other way, over the
/// channel the surface hands out when it is created.
pub trait MapSurface: Send + Sync {
    /// Create the map inside the given container
    fn create_map(&self, container_id: &str, center: Coordinates, zoom: u8);

    /// Place the marker, replacing any existing one
    fn place_marker(&self, at: Coordinates, draggable: bool);

    /// Remove the marker if present
    fn remove_marker(&self);

    /// Move the view to a point
    fn recenter(&self, at: Coordinates, zoom: u8);

    /// Add a custom control
    fn add_control(&self, control: MapControl);

    /// Show a user-facing message
    fn show_notice(&self, message: &str);
}
