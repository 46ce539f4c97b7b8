//! Test doubles for the external capabilities

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::fields::MemoryFields;
use crate::geo::{Candidate, DeviceLocator, GeocodingClient};
use crate::map::headless::{HeadlessMap, MapEvents};
use crate::picker::{LocationController, PickerOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub type SearchGate = oneshot::Sender<Result<Vec<Candidate>>>;
pub type ReverseGate = oneshot::Sender<Result<Option<String>>>;

pub type TestController = LocationController<HeadlessMap, MockGeocoder, MemoryFields, MockDevice>;

fn key(coords: Coordinates) -> String {
    coords.to_string()
}

/// Geocoder answering from canned data, or holding answers until released
#[derive(Debug, Default)]
pub struct MockGeocoder {
    answers: Mutex<HashMap<String, Vec<Candidate>>>,
    addresses: Mutex<HashMap<String, String>>,
    search_gates: Mutex<HashMap<String, oneshot::Receiver<Result<Vec<Candidate>>>>>,
    reverse_gates: Mutex<HashMap<String, oneshot::Receiver<Result<Option<String>>>>>,
    search_calls: Mutex<Vec<(String, Option<String>, usize)>>,
    reverse_calls: Mutex<Vec<Coordinates>>,
    fail_search: AtomicBool,
    fail_reverse: AtomicBool,
}

impl MockGeocoder {
    pub fn answer_search(&self, query: &str, candidates: Vec<Candidate>) {
        self.answers.lock().unwrap().insert(query.to_string(), candidates);
    }

    pub fn answer_reverse(&self, coords: Coordinates, address: &str) {
        self.addresses.lock().unwrap().insert(key(coords), address.to_string());
    }

    /// Hold the answer to `query` until the returned sender fires
    pub fn gate_search(&self, query: &str) -> SearchGate {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    /// Hold the reverse answer for `coords` until the returned sender fires
    pub fn gate_reverse(&self, coords: Coordinates) -> ReverseGate {
        let (tx, rx) = oneshot::channel();
        self.reverse_gates.lock().unwrap().insert(key(coords), rx);
        tx
    }

    pub fn fail_searches(&self) {
        self.fail_search.store(true, Ordering::SeqCst);
    }

    pub fn fail_reverses(&self) {
        self.fail_reverse.store(true, Ordering::SeqCst);
    }

    pub fn search_calls(&self) -> Vec<(String, Option<String>, usize)> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_calls().into_iter().map(|(q, _, _)| q).collect()
    }

    pub fn reverse_calls(&self) -> Vec<Coordinates> {
        self.reverse_calls.lock().unwrap().clone()
    }
}

impl GeocodingClient for MockGeocoder {
    async fn forward_search(
        &self,
        query: &str,
        country_filter: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Candidate>> {
        self.search_calls.lock().unwrap().push((
            query.to_string(),
            country_filter.map(str::to_string),
            limit,
        ));

        let gate = self.search_gates.lock().unwrap().remove(query);
        if let Some(gate) = gate {
            return gate
                .await
                .unwrap_or_else(|_| Err(Error::Geocoding("gate dropped".to_string())));
        }
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(Error::Geocoding("service unavailable".to_string()));
        }
        Ok(self.answers.lock().unwrap().get(query).cloned().unwrap_or_default())
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Option<String>> {
        self.reverse_calls.lock().unwrap().push(coords);

        let gate = self.reverse_gates.lock().unwrap().remove(&key(coords));
        if let Some(gate) = gate {
            return gate
                .await
                .unwrap_or_else(|_| Err(Error::Geocoding("gate dropped".to_string())));
        }
        if self.fail_reverse.load(Ordering::SeqCst) {
            return Err(Error::Geocoding("service unavailable".to_string()));
        }
        Ok(self.addresses.lock().unwrap().get(&key(coords)).cloned())
    }
}

/// Device locator with a fixed answer
#[derive(Debug, Default)]
pub struct MockDevice {
    position: Option<Coordinates>,
}

impl MockDevice {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            position: Some(Coordinates::new(lat, lng)),
        }
    }

    pub fn denied() -> Self {
        Self { position: None }
    }
}

impl DeviceLocator for MockDevice {
    async fn current_position(&self) -> Result<Coordinates> {
        self.position
            .ok_or_else(|| Error::LocationUnavailable("permission denied".to_string()))
    }
}

/// Options with no debounce delay
pub fn test_options() -> PickerOptions {
    let mut options = PickerOptions::default();
    options.search.debounce = std::time::Duration::ZERO;
    options
}

/// Build a controller over a headless map and in-memory fields
pub fn controller_with(
    options: PickerOptions,
    fields: MemoryFields,
    device: MockDevice,
) -> (TestController, MapEvents) {
    let (map, events) = HeadlessMap::new();
    let controller =
        LocationController::new(options, map, MockGeocoder::default(), fields, device);
    (controller, events)
}

pub fn controller() -> TestController {
    controller_with(test_options(), MemoryFields::new(), MockDevice::denied()).0
}

/// Yield to spawned tasks until `condition` holds
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
