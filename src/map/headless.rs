//! Headless map surface
//!
//! Keeps the view state a real renderer would show (center, zoom, marker,
//! controls, last notice) and turns simulated user interaction into
//! `MapEvent`s. Used by the CLI, the HTTP front end and tests.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::map::{MapControl, MapEvent, MapSurface};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Receiving end of a surface's event stream
pub type MapEvents = mpsc::UnboundedReceiver<MapEvent>;

/// The single marker on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinates,
    pub draggable: bool,
}

/// What the map currently shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Container the map was created in (None before `create_map`)
    pub container_id: Option<String>,
    pub center: Option<Coordinates>,
    pub zoom: u8,
    pub marker: Option<Marker>,
    pub controls: Vec<MapControl>,
    pub notice: Option<String>,
}

/// Map surface without a renderer
#[derive(Debug)]
pub struct HeadlessMap {
    view: Mutex<MapView>,
    events: mpsc::UnboundedSender<MapEvent>,
}

impl HeadlessMap {
    /// Create a surface and the stream of events it emits
    pub fn new() -> (Self, MapEvents) {
        let (events, receiver) = mpsc::unbounded_channel();
        let map = Self {
            view: Mutex::new(MapView {
                container_id: None,
                center: None,
                zoom: 0,
                marker: None,
                controls: Vec::new(),
                notice: None,
            }),
            events,
        };
        (map, receiver)
    }

    fn view_mut(&self) -> MutexGuard<'_, MapView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current view
    pub fn view(&self) -> MapView {
        self.view_mut().clone()
    }

    /// Simulate a click on the map
    pub fn click(&self, at: Coordinates) {
        self.emit(MapEvent::Click {
            lat: at.lat,
            lng: at.lng,
        });
    }

    /// Simulate dragging the marker to a new position
    ///
    /// Ignored when there is no draggable marker.
    pub fn drag_marker(&self, to: Coordinates) {
        {
            let mut view = self.view_mut();
            match view.marker.as_mut() {
                Some(marker) if marker.draggable => marker.position = to,
                _ => {
                    debug!("drag ignored, no draggable marker");
                    return;
                }
            }
        }
        self.emit(MapEvent::MarkerDragEnd {
            lat: to.lat,
            lng: to.lng,
        });
    }

    /// Simulate pressing the locate control
    ///
    /// Ignored when the control was never added.
    pub fn press_locate(&self) {
        if !self.view_mut().controls.contains(&MapControl::Locate) {
            debug!("locate control not present");
            return;
        }
        self.emit(MapEvent::LocateRequested);
    }

    fn emit(&self, event: MapEvent) {
        if self.events.send(event).is_err() {
            warn!(?event, "map event dropped, nobody is listening");
        }
    }

    /// Link to the current view on an online map
    pub fn view_url(&self, config: &Config, provider: Option<&str>) -> Result<Option<String>> {
        let view = self.view();
        view.center
            .map(|c| config.format_url(provider, c.lat, c.lng, view.zoom))
            .transpose()
    }
}

impl MapSurface for HeadlessMap {
    fn create_map(&self, container_id: &str, center: Coordinates, zoom: u8) {
        let mut view = self.view_mut();
        view.container_id = Some(container_id.to_string());
        view.center = Some(center);
        view.zoom = zoom;
    }

    fn place_marker(&self, at: Coordinates, draggable: bool) {
        self.view_mut().marker = Some(Marker {
            position: at,
            draggable,
        });
    }

    fn remove_marker(&self) {
        self.view_mut().marker = None;
    }

    fn recenter(&self, at: Coordinates, zoom: u8) {
        let mut view = self.view_mut();
        view.center = Some(at);
        view.zoom = zoom;
    }

    fn add_control(&self, control: MapControl) {
        let mut view = self.view_mut();
        if !view.controls.contains(&control) {
            view.controls.push(control);
        }
    }

    fn show_notice(&self, message: &str) {
        info!(%message, "map notice");
        self.view_mut().notice = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_map() {
        let (map, _events) = HeadlessMap::new();
        map.create_map("locationMap", Coordinates::new(24.7, 46.7), 10);

        let view = map.view();
        assert_eq!(view.container_id.as_deref(), Some("locationMap"));
        assert_eq!(view.center, Some(Coordinates::new(24.7, 46.7)));
        assert_eq!(view.zoom, 10);
        assert!(view.marker.is_none());
    }

    #[test]
    fn test_single_marker() {
        let (map, _events) = HeadlessMap::new();
        map.place_marker(Coordinates::new(1.0, 1.0), true);
        map.place_marker(Coordinates::new(2.0, 2.0), true);
        assert_eq!(map.view().marker.unwrap().position, Coordinates::new(2.0, 2.0));

        map.remove_marker();
        map.remove_marker();
        assert!(map.view().marker.is_none());
    }

    #[test]
    fn test_click_emits_event() {
        let (map, mut events) = HeadlessMap::new();
        map.click(Coordinates::new(24.7, 46.7));
        assert_eq!(events.try_recv().unwrap(), MapEvent::Click { lat: 24.7, lng: 46.7 });
    }

    #[test]
    fn test_drag_moves_marker_and_emits() {
        let (map, mut events) = HeadlessMap::new();
        map.drag_marker(Coordinates::new(5.0, 5.0));
        assert!(events.try_recv().is_err());

        map.place_marker(Coordinates::new(1.0, 1.0), true);
        map.drag_marker(Coordinates::new(5.0, 6.0));
        assert_eq!(map.view().marker.unwrap().position, Coordinates::new(5.0, 6.0));
        assert_eq!(
            events.try_recv().unwrap(),
            MapEvent::MarkerDragEnd { lat: 5.0, lng: 6.0 }
        );
    }

    #[test]
    fn test_locate_requires_control() {
        let (map, mut events) = HeadlessMap::new();
        map.press_locate();
        assert!(events.try_recv().is_err());

        map.add_control(MapControl::Locate);
        map.add_control(MapControl::Locate);
        assert_eq!(map.view().controls, vec![MapControl::Locate]);

        map.press_locate();
        assert_eq!(events.try_recv().unwrap(), MapEvent::LocateRequested);
    }

    #[test]
    fn test_view_url() {
        let (map, _events) = HeadlessMap::new();
        let config = Config::default();
        assert_eq!(map.view_url(&config, None).unwrap(), None);

        map.recenter(Coordinates::new(24.7, 46.7), 15);
        assert_eq!(
            map.view_url(&config, Some("openstreetmap")).unwrap().as_deref(),
            Some("https://www.openstreetmap.org/#map=15/24.7/46.7")
        );
    }

    #[test]
    fn test_show_notice() {
        let (map, _events) = HeadlessMap::new();
        map.show_notice("Device location is not supported");
        assert_eq!(map.view().notice.as_deref(), Some("Device location is not supported"));
    }
}
