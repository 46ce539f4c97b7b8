//! loc-picker: Interactive Location Picker
//!
//! A library and CLI tool for choosing a single geographic location by map
//! click, marker drag, place search or device position, and keeping bound
//! latitude, longitude and address fields in sync with it.
//!
//! ## Features
//!
//! - One selection per picker, mirrored into form fields with 6 decimals
//! - Reverse geocoding that never lets a stale answer overwrite a newer one
//! - Debounced forward search with country filtering
//! - Device location with a user-facing notice on failure
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use loc_picker::coord::{field, Coordinates};
//!
//! // Field values as a form would hold them
//! let saved = field::parse_pair(Some("24.713600"), Some("46.675300"));
//! assert_eq!(saved, Some(Coordinates::new(24.7136, 46.6753)));
//!
//! // Out-of-range coordinates are rejected before they reach the map
//! assert!(Coordinates::checked(91.0, 0.0).is_err());
//! assert_eq!(field::format_component(46.6753), "46.675300");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod fields;
pub mod geo;
pub mod map;
pub mod picker;
pub mod server;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use geo::Candidate;
pub use map::{MapEvent, MapSurface};
pub use picker::search::SearchResults;
pub use picker::selection::{LocationSnapshot, SelectionPhase};
pub use picker::{LocationController, PickerOptions};
