//! Keeps a map widget in step with the store: one marker per filtered
//! place, selection events back to the application.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::debug;

use crate::models::{GeoPoint, Place};
use crate::store::PlacesStore;

/// Default viewport, centred over Mumbai.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 19.0760,
    lon: 72.8777,
};
pub const DEFAULT_ZOOM: u8 = 12;

/// Zoom level when focusing a single place.
pub const FOCUS_ZOOM: u8 = 15;
pub const FLY_DURATION_SECS: f64 = 0.5;

/// Everything a widget needs to draw one place marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub place_id: String,
    pub position: GeoPoint,
    /// CSS hex color keyed off the accessibility status.
    pub color: &'static str,
    /// Popup title, the place display name.
    pub title: String,
}

/// Notifications flowing from the map back to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    PlaceSelected(String),
}

/// Rendering surface the sync engine drives. Implementations own the
/// actual drawing; handles identify markers for later removal.
pub trait MapWidget {
    type Handle;

    fn set_view(&mut self, center: GeoPoint, zoom: u8);
    fn add_marker(&mut self, spec: &MarkerSpec) -> Self::Handle;
    fn remove_marker(&mut self, handle: Self::Handle);
    fn fly_to(&mut self, center: GeoPoint, zoom: u8, duration_secs: f64);
    fn destroy(&mut self);
}

/// Owns a widget and mirrors the store's filtered places onto it.
///
/// The initial view is set exactly once, at construction; afterwards the
/// viewport only moves on an explicit [`focus`](MapSync::focus).
pub struct MapSync<W: MapWidget> {
    widget: W,
    markers: HashMap<String, W::Handle>,
    events: Sender<MapEvent>,
    synced_revision: Option<u64>,
}

impl<W: MapWidget> MapSync<W> {
    /// Wrap a widget, returning the engine and the event stream consumed
    /// by the application.
    pub fn new(mut widget: W) -> (Self, Receiver<MapEvent>) {
        widget.set_view(DEFAULT_CENTER, DEFAULT_ZOOM);
        let (events, receiver) = mpsc::channel();
        (
            Self {
                widget,
                markers: HashMap::new(),
                events,
                synced_revision: None,
            },
            receiver,
        )
    }

    /// Mirror the store's current filtered places onto the widget. Cheap
    /// when the store has not changed since the last call.
    pub fn sync(&mut self, store: &PlacesStore) {
        if self.synced_revision == Some(store.revision()) {
            return;
        }
        self.set_markers(&store.filtered_places());
        self.synced_revision = Some(store.revision());
    }

    /// Replace the displayed markers with one per given place.
    pub fn set_markers(&mut self, places: &[&Place]) {
        for (_, handle) in self.markers.drain() {
            self.widget.remove_marker(handle);
        }

        for place in places {
            let spec = MarkerSpec {
                place_id: place.id.clone(),
                position: place.position(),
                color: place.accessibility_status.color(),
                title: place.name.clone(),
            };
            let handle = self.widget.add_marker(&spec);
            self.markers.insert(place.id.clone(), handle);
        }

        debug!("Map now shows {} markers", self.markers.len());
    }

    /// Number of markers currently on the map.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Report a marker activation. Ids not currently on the map are
    /// ignored, so stale activations after a re-sync cannot select
    /// anything.
    pub fn activate_marker(&mut self, place_id: &str) {
        if self.markers.contains_key(place_id) {
            let _ = self
                .events
                .send(MapEvent::PlaceSelected(place_id.to_string()));
        }
    }

    /// Fly the viewport to one place.
    pub fn focus(&mut self, place: &Place) {
        self.widget
            .fly_to(place.position(), FOCUS_ZOOM, FLY_DURATION_SECS);
    }
}

impl<W: MapWidget> Drop for MapSync<W> {
    fn drop(&mut self) {
        for (_, handle) in self.markers.drain() {
            self.widget.remove_marker(handle);
        }
        self.widget.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PlacesApi;
    use crate::error::FetchError;
    use crate::models::place::AccessibilityProfile;
    use crate::models::{AccessibilityStatus, PlaceFilters};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recording {
        view: Option<(GeoPoint, u8)>,
        view_sets: usize,
        added: Vec<MarkerSpec>,
        removed: Vec<usize>,
        flights: Vec<(GeoPoint, u8, f64)>,
        destroyed: bool,
        next_handle: usize,
    }

    #[derive(Clone, Default)]
    struct RecordingWidget(Rc<RefCell<Recording>>);

    impl MapWidget for RecordingWidget {
        type Handle = usize;

        fn set_view(&mut self, center: GeoPoint, zoom: u8) {
            let mut recording = self.0.borrow_mut();
            recording.view = Some((center, zoom));
            recording.view_sets += 1;
        }

        fn add_marker(&mut self, spec: &MarkerSpec) -> usize {
            let mut recording = self.0.borrow_mut();
            let handle = recording.next_handle;
            recording.next_handle += 1;
            recording.added.push(spec.clone());
            handle
        }

        fn remove_marker(&mut self, handle: usize) {
            self.0.borrow_mut().removed.push(handle);
        }

        fn fly_to(&mut self, center: GeoPoint, zoom: u8, duration_secs: f64) {
            self.0.borrow_mut().flights.push((center, zoom, duration_secs));
        }

        fn destroy(&mut self) {
            self.0.borrow_mut().destroyed = true;
        }
    }

    fn place(id: &str, status: AccessibilityStatus) -> Place {
        Place {
            id: id.to_string(),
            name: format!("Place {id}"),
            name_local: None,
            category: "shop".to_string(),
            latitude: 19.0,
            longitude: 72.8,
            address: None,
            accessibility: AccessibilityProfile::default(),
            notes: None,
            photo_url: None,
            accessibility_status: status,
            updated_at: String::new(),
            source: Default::default(),
        }
    }

    #[test]
    fn test_initial_view_is_mumbai_and_set_once() {
        let widget = RecordingWidget::default();
        let (mut sync, _events) = MapSync::new(widget.clone());

        let places = vec![place("a", AccessibilityStatus::Unknown)];
        let refs: Vec<&Place> = places.iter().collect();
        sync.set_markers(&refs);
        sync.set_markers(&refs);

        let recording = widget.0.borrow();
        assert_eq!(recording.view, Some((DEFAULT_CENTER, DEFAULT_ZOOM)));
        assert_eq!(recording.view_sets, 1);
    }

    #[test]
    fn test_marker_count_matches_given_places() {
        let widget = RecordingWidget::default();
        let (mut sync, _events) = MapSync::new(widget.clone());

        let places = vec![
            place("a", AccessibilityStatus::Accessible),
            place("b", AccessibilityStatus::Unknown),
        ];
        let refs: Vec<&Place> = places.iter().collect();
        sync.set_markers(&refs);

        assert_eq!(sync.marker_count(), 2);
        assert_eq!(widget.0.borrow().added.len(), 2);
    }

    #[test]
    fn test_resync_removes_stale_markers() {
        let widget = RecordingWidget::default();
        let (mut sync, _events) = MapSync::new(widget.clone());

        let places = vec![
            place("a", AccessibilityStatus::Accessible),
            place("b", AccessibilityStatus::Unknown),
        ];
        sync.set_markers(&places.iter().collect::<Vec<_>>());
        sync.set_markers(&[&places[1]]);

        assert_eq!(sync.marker_count(), 1);
        let recording = widget.0.borrow();
        // Both originals removed, then the survivor re-added.
        assert_eq!(recording.removed.len(), 2);
        assert_eq!(recording.added.len(), 3);
        assert_eq!(recording.added[2].place_id, "b");
    }

    #[test]
    fn test_marker_colors_follow_status() {
        let widget = RecordingWidget::default();
        let (mut sync, _events) = MapSync::new(widget.clone());

        let places = vec![
            place("a", AccessibilityStatus::Accessible),
            place("b", AccessibilityStatus::PartiallyAccessible),
            place("c", AccessibilityStatus::NotAccessible),
            place("d", AccessibilityStatus::Unknown),
        ];
        sync.set_markers(&places.iter().collect::<Vec<_>>());

        let colors: Vec<&str> = widget.0.borrow().added.iter().map(|m| m.color).collect();
        assert_eq!(colors, vec!["#22c55e", "#eab308", "#ef4444", "#9ca3af"]);
    }

    #[test]
    fn test_activation_emits_selection_for_displayed_ids_only() {
        let widget = RecordingWidget::default();
        let (mut sync, events) = MapSync::new(widget);

        let places = vec![place("a", AccessibilityStatus::Accessible)];
        sync.set_markers(&places.iter().collect::<Vec<_>>());

        sync.activate_marker("a");
        assert_eq!(
            events.try_recv(),
            Ok(MapEvent::PlaceSelected("a".to_string()))
        );

        sync.activate_marker("ghost");
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_focus_flies_to_the_place() {
        let widget = RecordingWidget::default();
        let (mut sync, _events) = MapSync::new(widget.clone());

        let target = place("a", AccessibilityStatus::Accessible);
        sync.focus(&target);

        let recording = widget.0.borrow();
        assert_eq!(
            recording.flights,
            vec![(target.position(), FOCUS_ZOOM, FLY_DURATION_SECS)]
        );
    }

    #[test]
    fn test_drop_removes_markers_and_destroys_widget() {
        let widget = RecordingWidget::default();
        let (mut sync, _events) = MapSync::new(widget.clone());

        let places = vec![
            place("a", AccessibilityStatus::Accessible),
            place("b", AccessibilityStatus::Unknown),
        ];
        sync.set_markers(&places.iter().collect::<Vec<_>>());
        drop(sync);

        let recording = widget.0.borrow();
        assert_eq!(recording.removed.len(), 2);
        assert!(recording.destroyed);
    }

    struct StubApi {
        places: Vec<Place>,
    }

    impl PlacesApi for StubApi {
        async fn fetch_places(&self) -> Result<Vec<Place>, FetchError> {
            Ok(self.places.clone())
        }

        async fn fetch_fallback(&self) -> Result<Vec<Place>, FetchError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_sync_is_idempotent_until_the_store_changes() {
        let api = StubApi {
            places: vec![
                place("a", AccessibilityStatus::Accessible),
                place("b", AccessibilityStatus::Unknown),
            ],
        };
        let mut store = PlacesStore::new();
        store.load(&api).await;

        let widget = RecordingWidget::default();
        let (mut sync, _events) = MapSync::new(widget.clone());

        sync.sync(&store);
        sync.sync(&store);
        assert_eq!(widget.0.borrow().added.len(), 2);

        store.update_filters(PlaceFilters {
            accessibility_status: Some(vec![AccessibilityStatus::Accessible]),
            ..Default::default()
        });
        sync.sync(&store);

        assert_eq!(sync.marker_count(), 1);
        assert_eq!(widget.0.borrow().added.len(), 3);
    }
}
