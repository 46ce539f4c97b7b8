//! Field text conversion
//!
//! Bound fields hold plain text. Coordinates are written with a fixed
//! number of decimals and parsed back leniently (surrounding whitespace is
//! ignored, anything unparseable reads as unset).

use crate::constants::coord::FIELD_PRECISION;
use crate::coord::Coordinates;

/// Format one coordinate component for a bound field
pub fn format_component(value: f64) -> String {
    format!("{:.*}", FIELD_PRECISION, value)
}

/// Parse one coordinate component from a bound field
///
/// Returns None for missing, empty or non-numeric text.
pub fn parse_component(text: Option<&str>) -> Option<f64> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a latitude/longitude field pair into valid coordinates
///
/// Both fields must parse and the pair must be in range.
pub fn parse_pair(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let coords = Coordinates::new(parse_component(lat)?, parse_component(lng)?);
    coords.validate().ok().map(|_| coords)
}
