use super::*;
use crate::fields::MemoryFields;
use crate::geo::Candidate;
use crate::testing::{controller, controller_with, test_options, wait_until, MockDevice};
use approx::assert_abs_diff_eq;

fn riyadh() -> Candidate {
    Candidate::new(24.7, 46.7, "Riyadh, Saudi Arabia")
}

#[test]
fn test_options_from_config() {
    let mut config = Config::default();
    config.search.country_codes = " ".to_string();
    config.search.debounce_ms = 120;
    config.picker.address_field_id = "street".to_string();

    let options = PickerOptions::from(&config);
    assert_eq!(options.address_field_id, "street");
    assert_eq!(options.search.country_filter, None);
    assert_eq!(options.search.debounce, Duration::from_millis(120));
    assert_eq!(options.default_center, Coordinates::new(24.7136, 46.6753));
}

#[test]
fn test_new_creates_map_with_controls() {
    let controller = controller();
    let view = controller.map().view();

    assert_eq!(view.container_id.as_deref(), Some("locationMap"));
    assert_eq!(view.center, Some(Coordinates::new(24.7136, 46.6753)));
    assert_eq!(view.zoom, 10);
    assert_eq!(view.controls, vec![MapControl::Locate, MapControl::Search]);
    assert!(view.marker.is_none());
    assert_eq!(controller.phase(), SelectionPhase::Empty);
}

#[test]
fn test_new_restores_saved_location() {
    let fields = MemoryFields::with_values([
        ("latitude", "21.4858"),
        ("longitude", "39.1925"),
        ("address", "Jeddah"),
    ]);
    let (controller, _events) = controller_with(test_options(), fields, MockDevice::denied());

    let view = controller.map().view();
    assert_eq!(view.marker.unwrap().position, Coordinates::new(21.4858, 39.1925));
    assert_eq!(view.zoom, 15);
    assert_eq!(controller.phase(), SelectionPhase::Positioned);
    assert_eq!(controller.selection().address(), "Jeddah");

    let snapshot = controller.get_location();
    assert_eq!(controller.fields().read("latitude").as_deref(), Some("21.485800"));
    assert_eq!(snapshot.address, "Jeddah");
    assert!(controller.geocoder().reverse_calls().is_empty());
}

#[test]
fn test_new_ignores_partial_saved_location() {
    let fields = MemoryFields::with_values([("latitude", "21.4858"), ("longitude", "")]);
    let (controller, _events) = controller_with(test_options(), fields, MockDevice::denied());

    assert_eq!(controller.phase(), SelectionPhase::Empty);
    assert!(controller.map().view().marker.is_none());
}

#[test]
fn test_search_disabled() {
    let mut options = test_options();
    options.search_enabled = false;
    let (controller, _events) = controller_with(options, MemoryFields::new(), MockDevice::denied());

    assert_eq!(controller.map().view().controls, vec![MapControl::Locate]);
    assert!(controller.search().is_none());
    assert!(controller.search_results().is_none());
    assert!(controller.search_input("Riyadh").unwrap().is_none());
    assert!(controller.geocoder().search_queries().is_empty());
}

#[tokio::test]
async fn test_set_then_get_round_trip() {
    let controller = controller();
    for (lat, lng) in [(24.7136, 46.6753), (-33.868820, 151.209296), (90.0, -180.0), (0.0, 0.0)] {
        controller.set_location(lat, lng, None).unwrap();

        let snapshot = controller.get_location();
        assert_abs_diff_eq!(snapshot.lat.unwrap(), lat, epsilon = 1e-6);
        assert_abs_diff_eq!(snapshot.lng.unwrap(), lng, epsilon = 1e-6);
    }
}

#[tokio::test]
async fn test_set_location_formats_six_decimals() {
    let controller = controller();
    controller.set_location(24.7, 46.123456789, None).unwrap();

    assert_eq!(controller.fields().read("latitude").as_deref(), Some("24.700000"));
    assert_eq!(controller.fields().read("longitude").as_deref(), Some("46.123457"));
}

#[tokio::test]
async fn test_set_location_moves_marker_and_view() {
    let controller = controller();
    controller.set_location(24.7, 46.7, None).unwrap();
    controller.set_location(26.4, 50.1, None).unwrap();

    let view = controller.map().view();
    let marker = view.marker.unwrap();
    assert_eq!(marker.position, Coordinates::new(26.4, 50.1));
    assert!(marker.draggable);
    assert_eq!(view.center, Some(Coordinates::new(26.4, 50.1)));
    assert_eq!(view.zoom, 15);
    assert_eq!(controller.phase(), SelectionPhase::Positioned);
}

#[tokio::test]
async fn test_invalid_coordinate_leaves_state_unchanged() {
    let controller = controller();
    controller.set_location(24.7, 46.7, Some("Riyadh")).unwrap();
    let before = controller.get_location();
    let selection = controller.selection();

    for (lat, lng) in [(91.0, 0.0), (0.0, 181.0), (f64::NAN, 0.0)] {
        let result = controller.set_location(lat, lng, Some("Nowhere"));
        assert!(matches!(result, Err(Error::InvalidCoordinate(_))));
    }

    assert_eq!(controller.get_location(), before);
    assert_eq!(controller.selection(), selection);
    assert_eq!(
        controller.map().view().marker.unwrap().position,
        Coordinates::new(24.7, 46.7)
    );
}

#[tokio::test]
async fn test_empty_address_does_not_overwrite() {
    let controller = controller();
    controller.set_location(24.7, 46.7, Some("Riyadh")).unwrap();
    controller.set_location(24.8, 46.8, Some("")).unwrap();

    assert_eq!(controller.get_location().address, "Riyadh");
}

#[tokio::test]
async fn test_get_location_sees_manual_edits() {
    let controller = controller();
    controller.set_location(24.7, 46.7, Some("Riyadh")).unwrap();

    controller.fields().write("latitude", "25.1");
    controller.fields().write("address", "Typed by hand");
    controller.fields().write("longitude", "not a number");

    let snapshot = controller.get_location();
    assert_eq!(snapshot.lat, Some(25.1));
    assert_eq!(snapshot.lng, None);
    assert_eq!(snapshot.address, "Typed by hand");
    assert!(!snapshot.has_selection());
}

#[tokio::test]
async fn test_clear_location_is_idempotent() {
    let controller = controller();
    controller.set_location(24.7, 46.7, Some("Riyadh")).unwrap();

    controller.clear_location();
    let after_first = (controller.get_location(), controller.selection());
    controller.clear_location();

    assert_eq!((controller.get_location(), controller.selection()), after_first);
    assert_eq!(
        after_first.0,
        LocationSnapshot {
            lat: None,
            lng: None,
            address: String::new(),
        }
    );
    assert_eq!(controller.phase(), SelectionPhase::Empty);
    assert!(controller.map().view().marker.is_none());
    assert_eq!(controller.fields().read("address").as_deref(), Some(""));
}

#[tokio::test]
async fn test_reverse_geocode_fills_address() {
    let controller = controller();
    controller
        .geocoder()
        .answer_reverse(Coordinates::new(24.7, 46.7), "King Fahd Rd, Riyadh");

    let lookup = controller.set_location(24.7, 46.7, None).unwrap();
    assert!(lookup.finished().await);

    assert_eq!(controller.get_location().address, "King Fahd Rd, Riyadh");
    assert_eq!(controller.selection().address(), "King Fahd Rd, Riyadh");
}

#[tokio::test]
async fn test_reverse_geocode_failure_keeps_address() {
    let controller = controller();
    controller.set_location(24.7, 46.7, Some("Riyadh")).unwrap();
    controller.geocoder().fail_reverses();

    let lookup = controller.set_location(24.8, 46.8, None).unwrap();
    assert!(!lookup.finished().await);

    assert_eq!(controller.get_location().address, "Riyadh");
    assert_eq!(controller.phase(), SelectionPhase::Positioned);
}

#[tokio::test]
async fn test_reverse_geocode_without_address_keeps_address() {
    let controller = controller();
    controller.set_location(24.7, 46.7, Some("Riyadh")).unwrap();

    let lookup = controller.set_location(20.0, 60.0, None).unwrap();
    assert!(!lookup.finished().await);
    assert_eq!(controller.get_location().address, "Riyadh");
}

#[tokio::test]
async fn test_stale_reverse_geocode_is_discarded() {
    let controller = controller();
    let first = Coordinates::new(24.7, 46.7);
    let second = Coordinates::new(21.5, 39.2);
    let first_gate = controller.geocoder().gate_reverse(first);
    controller.geocoder().answer_reverse(second, "Jeddah");

    let slow = controller.set_location(first.lat, first.lng, None).unwrap();
    let fast = controller.set_location(second.lat, second.lng, None).unwrap();
    assert!(fast.finished().await);

    first_gate.send(Ok(Some("Riyadh".to_string()))).unwrap();
    assert!(!slow.finished().await);

    assert_eq!(controller.get_location().address, "Jeddah");
}

#[tokio::test]
async fn test_clear_discards_in_flight_reverse_geocode() {
    let controller = controller();
    let coords = Coordinates::new(24.7, 46.7);
    let gate = controller.geocoder().gate_reverse(coords);

    let lookup = controller.set_location(coords.lat, coords.lng, None).unwrap();
    controller.clear_location();
    gate.send(Ok(Some("Riyadh".to_string()))).unwrap();

    assert!(!lookup.finished().await);
    assert_eq!(controller.get_location().address, "");
    assert_eq!(controller.phase(), SelectionPhase::Empty);
}

#[tokio::test]
async fn test_select_candidate_then_reverse_geocode() {
    let controller = controller();
    let coords = Coordinates::new(24.7, 46.7);
    let gate = controller.geocoder().gate_reverse(coords);

    let lookup = controller.select_candidate(&riyadh()).unwrap();
    assert_eq!(
        controller.get_location(),
        LocationSnapshot {
            lat: Some(24.7),
            lng: Some(46.7),
            address: "Riyadh, Saudi Arabia".to_string(),
        }
    );

    gate.send(Ok(Some("Al Olaya, Riyadh 12211, Saudi Arabia".to_string())))
        .unwrap();
    assert!(lookup.finished().await);
    assert_eq!(
        controller.get_location().address,
        "Al Olaya, Riyadh 12211, Saudi Arabia"
    );
}

#[tokio::test]
async fn test_select_candidate_clears_search_box() {
    let controller = controller();
    controller.geocoder().answer_search("Riyadh", vec![riyadh()]);

    assert!(controller.search_input("Riyadh").unwrap().unwrap().finished().await);
    let results = controller.search_results().unwrap();
    assert_eq!(results.candidates(), &[riyadh()]);

    let candidate = results.candidates()[0].clone();
    controller.select_candidate(&candidate).unwrap();

    let search = controller.search().unwrap();
    assert_eq!(search.results(), SearchResults::Hidden);
    assert_eq!(search.input(), "");
}

#[tokio::test]
async fn test_select_invalid_candidate_is_rejected() {
    let controller = controller();
    let result = controller.select_candidate(&Candidate::new(100.0, 0.0, "Bad"));
    assert!(matches!(result, Err(Error::InvalidCoordinate(_))));
    assert_eq!(controller.phase(), SelectionPhase::Empty);
}

#[tokio::test]
async fn test_device_location_success() {
    let (controller, _events) =
        controller_with(test_options(), MemoryFields::new(), MockDevice::at(26.43, 50.10));
    controller
        .geocoder()
        .answer_reverse(Coordinates::new(26.43, 50.10), "Dammam");

    let lookup = controller.request_current_device_location().await.unwrap();
    assert!(lookup.finished().await);

    let snapshot = controller.get_location();
    assert_eq!(snapshot.coordinates(), Some(Coordinates::new(26.43, 50.10)));
    assert_eq!(snapshot.address, "Dammam");
}

#[tokio::test]
async fn test_device_location_failure_leaves_state() {
    let controller = controller();
    controller.set_location(24.7, 46.7, Some("Riyadh")).unwrap();
    let before = (controller.get_location(), controller.selection());

    let result = controller.request_current_device_location().await;
    assert!(matches!(result, Err(Error::LocationUnavailable(_))));

    assert_eq!((controller.get_location(), controller.selection()), before);
    assert_eq!(
        controller.map().view().notice.as_deref(),
        Some("permission denied")
    );
}

#[tokio::test]
async fn test_map_click_and_drag() {
    let controller = controller();
    controller
        .geocoder()
        .answer_reverse(Coordinates::new(24.7, 46.7), "Riyadh");
    controller
        .geocoder()
        .answer_reverse(Coordinates::new(24.75, 46.72), "Al Malaz, Riyadh");

    let lookup = controller
        .handle_map_event(MapEvent::Click { lat: 24.7, lng: 46.7 })
        .await
        .unwrap();
    assert!(lookup.finished().await);
    assert_eq!(controller.get_location().address, "Riyadh");

    let lookup = controller
        .handle_map_event(MapEvent::MarkerDragEnd {
            lat: 24.75,
            lng: 46.72,
        })
        .await
        .unwrap();
    assert!(lookup.finished().await);

    let snapshot = controller.get_location();
    assert_eq!(snapshot.coordinates(), Some(Coordinates::new(24.75, 46.72)));
    assert_eq!(snapshot.address, "Al Malaz, Riyadh");
}

#[tokio::test]
async fn test_run_events_drives_selection() {
    let (controller, events) = controller_with(test_options(), MemoryFields::new(), MockDevice::denied());
    let worker = tokio::spawn(controller.run_events(events));

    controller.map().click(Coordinates::new(24.7, 46.7));
    wait_until(|| controller.phase() == SelectionPhase::Positioned).await;

    controller.map().drag_marker(Coordinates::new(24.8, 46.8));
    wait_until(|| controller.get_location().lat == Some(24.8)).await;

    // a failing locate request must not stop the loop
    controller.map().press_locate();
    wait_until(|| controller.map().view().notice.is_some()).await;
    controller.map().click(Coordinates::new(21.5, 39.2));
    wait_until(|| controller.get_location().lat == Some(21.5)).await;

    // the loop ends once the last handle and the map with it are gone
    drop(controller);
    let finished = tokio::time::timeout(Duration::from_secs(2), worker).await;
    assert!(matches!(finished, Ok(Ok(()))));
}

#[test]
fn test_set_location_needs_runtime() {
    let controller = controller();

    let result = controller.set_location(24.7, 46.7, Some("Riyadh"));
    assert!(matches!(result, Err(Error::Runtime(_))));
    assert_eq!(controller.phase(), SelectionPhase::Empty);
    assert!(!controller.get_location().has_selection());
    assert!(controller.map().view().marker.is_none());

    // invalid input is still reported as such
    let result = controller.set_location(91.0, 0.0, None);
    assert!(matches!(result, Err(Error::InvalidCoordinate(_))));

    let result = controller.select_candidate(&riyadh());
    assert!(matches!(result, Err(Error::Runtime(_))));
    assert!(matches!(controller.search_input("Riyadh"), Err(Error::Runtime(_))));
}
