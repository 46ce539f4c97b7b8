//! Selection state
//!
//! The coordinate and address the picker currently holds, and the snapshot
//! type returned when reading the bound fields back.

use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};

/// Phase of a selection cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    Empty,
    Positioned,
}

/// Current selection
///
/// Latitude and longitude are stored together so one can never be set
/// without the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    coordinates: Option<Coordinates>,
    address: String,
}

impl SelectionState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Selection restored from saved field values
    pub fn restored(coordinates: Coordinates, address: impl Into<String>) -> Self {
        Self {
            coordinates: Some(coordinates),
            address: address.into(),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn has_selection(&self) -> bool {
        self.coordinates.is_some()
    }

    pub fn phase(&self) -> SelectionPhase {
        if self.has_selection() {
            SelectionPhase::Positioned
        } else {
            SelectionPhase::Empty
        }
    }

    /// Move the selection to a new point
    ///
    /// An empty or missing address keeps the previous address text.
    pub(crate) fn position(&mut self, coordinates: Coordinates, address: Option<&str>) {
        self.coordinates = Some(coordinates);
        if let Some(address) = address.filter(|a| !a.is_empty()) {
            self.address = address.to_string();
        }
    }

    /// Replace the address of a positioned selection
    pub(crate) fn set_address(&mut self, address: &str) {
        if self.has_selection() {
            self.address = address.to_string();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.coordinates = None;
        self.address.clear();
    }
}

/// Selection as currently found in the bound fields
///
/// Values are parsed on every read, so manual edits made to the fields
/// since the last write are reflected. A field that is empty or not a
/// number reads as None.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: String,
}

impl LocationSnapshot {
    /// Both fields as a coordinate, if both are present
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.lat?, self.lng?))
    }

    pub fn has_selection(&self) -> bool {
        self.coordinates().is_some()
    }
}
