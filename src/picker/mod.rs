//! Location picker
//!
//! `LocationController` reconciles the four ways a location can be chosen
//! (map click, marker drag, search selection, device location) into a
//! single selection, mirrors it into the bound fields and keeps the address
//! in step with the coordinate through reverse geocoding.
//!
//! ## Selection cycle
//! `Empty` → `Positioned` on the first successful `set_location`, stays
//! `Positioned` on every later update, back to `Empty` on `clear_location`.
//! Failed lookups never change the phase.
//!
//! ## Ordering
//! Reverse lookups run in the background and are tagged with a sequence
//! number. Only the answer for the latest coordinate is written; answers
//! for superseded coordinates, or arriving after a clear, are dropped.

pub mod search;
pub mod selection;

#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::config::defaults::*;
use crate::coord::{field, Coordinates};
use crate::error::{Error, Result};
use crate::fields::FieldStore;
use crate::geo::{Candidate, DeviceLocator, GeocodingClient};
use crate::map::headless::MapEvents;
use crate::map::{MapControl, MapEvent, MapSurface};
use search::{SearchOptions, SearchResults, SearchSession, SearchTask};
use selection::{LocationSnapshot, SelectionPhase, SelectionState};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Construction options
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOptions {
    pub map_surface_id: String,
    pub lat_field_id: String,
    pub lng_field_id: String,
    pub address_field_id: String,
    pub default_center: Coordinates,
    pub default_zoom: u8,
    /// Zoom used when the map focuses on a selected point
    pub focus_zoom: u8,
    /// If false, no search control is added and no search is ever issued
    pub search_enabled: bool,
    pub search: SearchOptions,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            map_surface_id: DEFAULT_MAP_SURFACE_ID.to_string(),
            lat_field_id: DEFAULT_LAT_FIELD_ID.to_string(),
            lng_field_id: DEFAULT_LNG_FIELD_ID.to_string(),
            address_field_id: DEFAULT_ADDRESS_FIELD_ID.to_string(),
            default_center: Coordinates::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            default_zoom: DEFAULT_ZOOM,
            focus_zoom: DEFAULT_FOCUS_ZOOM,
            search_enabled: true,
            search: SearchOptions {
                debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
                ..SearchOptions::default()
            },
        }
    }
}

impl From<&Config> for PickerOptions {
    fn from(config: &Config) -> Self {
        let countries = config.search.country_codes.trim();
        Self {
            map_surface_id: config.picker.map_surface_id.clone(),
            lat_field_id: config.picker.lat_field_id.clone(),
            lng_field_id: config.picker.lng_field_id.clone(),
            address_field_id: config.picker.address_field_id.clone(),
            default_center: Coordinates::new(config.map.default_lat, config.map.default_lng),
            default_zoom: config.map.default_zoom,
            focus_zoom: config.map.focus_zoom,
            search_enabled: config.search.enabled,
            search: SearchOptions {
                min_query_len: config.search.min_query_len,
                debounce: Duration::from_millis(config.search.debounce_ms),
                country_filter: (!countries.is_empty()).then(|| countries.to_string()),
                limit: config.search.limit,
            },
        }
    }
}

/// Handle of the tokio runtime background lookups are spawned on
pub(crate) fn runtime_handle() -> Result<Handle> {
    Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))
}

/// Handle to a background reverse geocode
///
/// Dropping it leaves the lookup running.
#[derive(Debug)]
pub struct ReverseLookup {
    seq: u64,
    handle: JoinHandle<bool>,
}

impl ReverseLookup {
    /// Sequence number of the coordinate change that started the lookup
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Wait for the lookup; true if it wrote an address
    pub async fn finished(self) -> bool {
        self.handle.await.unwrap_or(false)
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    selection: SelectionState,
    marker_placed: bool,
    lookup_seq: u64,
}

struct Inner<M, G, F, D> {
    options: PickerOptions,
    map: M,
    geocoder: Arc<G>,
    fields: F,
    device: D,
    search: Option<SearchSession<G>>,
    state: Mutex<ControllerState>,
}

/// Keeps one selection in sync across map, search, device and fields
///
/// Cloning is cheap and every clone drives the same selection.
pub struct LocationController<M, G, F, D> {
    inner: Arc<Inner<M, G, F, D>>,
}

impl<M, G, F, D> Clone for LocationController<M, G, F, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M, G, F, D> LocationController<M, G, F, D>
where
    M: MapSurface + 'static,
    G: GeocodingClient + 'static,
    F: FieldStore + 'static,
    D: DeviceLocator + 'static,
{
    /// Create the map, add its controls and restore any saved selection
    pub fn new(options: PickerOptions, map: M, geocoder: G, fields: F, device: D) -> Self {
        map.create_map(&options.map_surface_id, options.default_center, options.default_zoom);
        map.add_control(MapControl::Locate);

        let geocoder = Arc::new(geocoder);
        let search = if options.search_enabled {
            map.add_control(MapControl::Search);
            Some(SearchSession::new(Arc::clone(&geocoder), options.search.clone()))
        } else {
            None
        };

        let controller = Self {
            inner: Arc::new(Inner {
                options,
                map,
                geocoder,
                fields,
                device,
                search,
                state: Mutex::new(ControllerState::default()),
            }),
        };
        controller.restore_saved();
        controller
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pick up a selection left in the fields by an earlier session
    ///
    /// The saved address is kept as is; no reverse lookup is issued.
    fn restore_saved(&self) {
        let options = &self.inner.options;
        let lat = self.inner.fields.read(&options.lat_field_id);
        let lng = self.inner.fields.read(&options.lng_field_id);

        match field::parse_pair(lat.as_deref(), lng.as_deref()) {
            Some(coords) => {
                let address = self
                    .inner
                    .fields
                    .read(&options.address_field_id)
                    .unwrap_or_default();
                let mut state = self.state();
                state.selection = SelectionState::restored(coords, address);
                self.show_at(&mut state, coords);
                self.write_coordinates(coords);
                info!(%coords, "restored saved location");
            }
            None => {
                let has_text = |v: &Option<String>| v.as_deref().is_some_and(|t| !t.trim().is_empty());
                if has_text(&lat) || has_text(&lng) {
                    warn!(?lat, ?lng, "saved fields do not hold a valid coordinate");
                }
            }
        }
    }

    /// Move the marker to a point and focus the map on it
    fn show_at(&self, state: &mut ControllerState, coords: Coordinates) {
        let map = &self.inner.map;
        if state.marker_placed {
            map.remove_marker();
        }
        map.place_marker(coords, true);
        state.marker_placed = true;
        map.recenter(coords, self.inner.options.focus_zoom);
    }

    fn write_coordinates(&self, coords: Coordinates) {
        let options = &self.inner.options;
        let fields = &self.inner.fields;
        fields.write(&options.lat_field_id, &field::format_component(coords.lat));
        fields.write(&options.lng_field_id, &field::format_component(coords.lng));
    }

    /// Select a location
    ///
    /// Rejects out-of-range input before touching any state. A non-empty
    /// `address` is written right away; otherwise the address field keeps
    /// its text until the reverse lookup answers.
    ///
    /// Must be called inside a tokio runtime; otherwise fails with
    /// `Error::Runtime` and nothing changes.
    pub fn set_location(&self, lat: f64, lng: f64, address: Option<&str>) -> Result<ReverseLookup> {
        let coords = Coordinates::checked(lat, lng)?;
        let runtime = runtime_handle()?;
        let address = address.filter(|a| !a.is_empty());

        let seq = {
            let mut state = self.state();
            state.selection.position(coords, address);
            self.show_at(&mut state, coords);
            self.write_coordinates(coords);
            if let Some(address) = address {
                self.inner
                    .fields
                    .write(&self.inner.options.address_field_id, address);
            }
            state.lookup_seq += 1;
            state.lookup_seq
        };

        info!(%coords, seq, "location set");
        Ok(self.spawn_reverse_lookup(&runtime, seq, coords))
    }

    fn spawn_reverse_lookup(&self, runtime: &Handle, seq: u64, coords: Coordinates) -> ReverseLookup {
        let controller = self.clone();
        let handle = runtime.spawn(async move { controller.reverse_lookup(seq, coords).await });
        ReverseLookup { seq, handle }
    }

    async fn reverse_lookup(&self, seq: u64, coords: Coordinates) -> bool {
        match self.inner.geocoder.reverse_geocode(coords).await {
            Ok(Some(address)) => self.apply_address(seq, &address),
            Ok(None) => {
                debug!(%coords, "no address for location");
                false
            }
            Err(e) => {
                warn!(error = %e, %coords, "reverse geocode failed");
                false
            }
        }
    }

    /// Write a reverse-geocoded address if it still belongs to the selection
    fn apply_address(&self, seq: u64, address: &str) -> bool {
        let mut state = self.state();
        if seq != state.lookup_seq {
            debug!(seq, current = state.lookup_seq, "discarding stale reverse geocode");
            return false;
        }
        state.selection.set_address(address);
        self.inner
            .fields
            .write(&self.inner.options.address_field_id, address);
        true
    }

    /// Read the selection back from the bound fields
    pub fn get_location(&self) -> LocationSnapshot {
        let options = &self.inner.options;
        let fields = &self.inner.fields;
        LocationSnapshot {
            lat: field::parse_component(fields.read(&options.lat_field_id).as_deref()),
            lng: field::parse_component(fields.read(&options.lng_field_id).as_deref()),
            address: fields.read(&options.address_field_id).unwrap_or_default(),
        }
    }

    /// Drop the selection, the marker and the field contents
    pub fn clear_location(&self) {
        let mut state = self.state();
        if state.marker_placed {
            self.inner.map.remove_marker();
            state.marker_placed = false;
        }
        state.selection.clear();
        state.lookup_seq += 1;

        let options = &self.inner.options;
        for id in [
            &options.lat_field_id,
            &options.lng_field_id,
            &options.address_field_id,
        ] {
            self.inner.fields.write(id, "");
        }
        debug!("location cleared");
    }

    /// Select the device's current position
    ///
    /// On failure a notice is shown on the map and the selection is left
    /// untouched.
    pub async fn request_current_device_location(&self) -> Result<ReverseLookup> {
        let position = self
            .inner
            .device
            .current_position()
            .await
            .and_then(|coords| coords.validate().map(|_| coords));

        match position {
            Ok(coords) => self.set_location(coords.lat, coords.lng, None),
            Err(e) => {
                let message = match e {
                    Error::LocationUnavailable(message) => message,
                    other => other.to_string(),
                };
                warn!(%message, "device location unavailable");
                self.inner.map.show_notice(&message);
                Err(Error::LocationUnavailable(message))
            }
        }
    }

    /// React to a map interaction
    pub async fn handle_map_event(&self, event: MapEvent) -> Result<ReverseLookup> {
        debug!(?event, "map event");
        match event {
            MapEvent::Click { lat, lng } | MapEvent::MarkerDragEnd { lat, lng } => {
                self.set_location(lat, lng, None)
            }
            MapEvent::LocateRequested => self.request_current_device_location().await,
        }
    }

    /// Handle map events in order until the surface goes away
    ///
    /// The returned future only holds a weak reference, so it ends once
    /// every controller handle is dropped and the map's sender with it.
    pub fn run_events(&self, mut events: MapEvents) -> impl Future<Output = ()> + Send + 'static {
        let inner: Weak<Inner<M, G, F, D>> = Arc::downgrade(&self.inner);
        async move {
            while let Some(event) = events.recv().await {
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                let controller = Self { inner };
                if let Err(e) = controller.handle_map_event(event).await {
                    warn!(error = %e, ?event, "map event not applied");
                }
            }
            debug!("map event stream closed");
        }
    }

    /// Feed the search box; None if search is disabled or input is too short
    pub fn search_input(&self, text: &str) -> Result<Option<SearchTask>> {
        match &self.inner.search {
            Some(search) => search.on_input(text),
            None => {
                debug!("search disabled, input ignored");
                Ok(None)
            }
        }
    }

    /// Select a search candidate, then clear the search box
    pub fn select_candidate(&self, candidate: &Candidate) -> Result<ReverseLookup> {
        let lookup = self.set_location(
            candidate.lat,
            candidate.lng,
            Some(candidate.display_name.as_str()),
        )?;
        if let Some(search) = &self.inner.search {
            search.dismiss();
        }
        Ok(lookup)
    }

    /// Currently rendered search results, None if search is disabled
    pub fn search_results(&self) -> Option<SearchResults> {
        self.inner.search.as_ref().map(SearchSession::results)
    }

    pub fn search(&self) -> Option<&SearchSession<G>> {
        self.inner.search.as_ref()
    }

    /// Copy of the selection as last written by the controller
    pub fn selection(&self) -> SelectionState {
        self.state().selection.clone()
    }

    pub fn phase(&self) -> SelectionPhase {
        self.state().selection.phase()
    }

    pub fn options(&self) -> &PickerOptions {
        &self.inner.options
    }

    pub fn map(&self) -> &M {
        &self.inner.map
    }

    pub fn fields(&self) -> &F {
        &self.inner.fields
    }

    pub fn geocoder(&self) -> &G {
        &self.inner.geocoder
    }
}
