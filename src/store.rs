//! Owned client-side state: the loaded place collection, the active
//! filters, and the derived views read by the map and the CLI.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::PlacesApi;
use crate::models::{AccessibilityStatus, GeoPoint, Place, PlaceFilters};

/// Prefix of the message surfaced when both the backend and the snapshot
/// fail; the backend failure's own message is appended after it.
pub const LOAD_ERROR: &str = "Failed to load places data";

/// Aggregate counts over the loaded collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub total: usize,
    pub accessible: usize,
    pub partially_accessible: usize,
    pub not_accessible: usize,
    pub unknown: usize,
    /// Category and its place count, most common first.
    pub by_category: Vec<(String, usize)>,
}

/// Holds the place collection and filter state, and answers queries over
/// them. Derivations are computed on demand; `revision` ticks whenever the
/// underlying data or filters change, so consumers can cache against it.
#[derive(Debug, Default)]
pub struct PlacesStore {
    places: Vec<Place>,
    filters: PlaceFilters,
    loading: bool,
    error: Option<String>,
    revision: u64,
}

impl PlacesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load places, preferring the live backend and falling back to the
    /// bundled snapshot when it is unreachable.
    pub async fn load(&mut self, api: &impl PlacesApi) {
        self.loading = true;

        match api.fetch_places().await {
            Ok(places) => {
                self.replace_places(places);
                self.error = None;
            }
            Err(primary) => {
                warn!("Backend fetch failed ({primary}), trying bundled snapshot");
                match api.fetch_fallback().await {
                    Ok(places) => {
                        self.replace_places(places);
                        self.error = None;
                    }
                    Err(fallback) => {
                        warn!("Snapshot fetch failed too: {fallback}");
                        self.error = Some(format!("{LOAD_ERROR}: {primary}"));
                    }
                }
            }
        }

        self.loading = false;
    }

    /// Re-fetch from the backend only, for picking up fresh data after a
    /// contribution. Failure leaves the current collection and error state
    /// untouched.
    pub async fn refetch(&mut self, api: &impl PlacesApi) {
        match api.fetch_places().await {
            Ok(places) => {
                self.replace_places(places);
                self.error = None;
            }
            Err(err) => {
                debug!("Refetch failed, keeping current places: {err}");
            }
        }
    }

    /// Replace the active filter set wholesale. Field-by-field merging is
    /// deliberately not offered.
    pub fn update_filters(&mut self, filters: PlaceFilters) {
        if self.filters != filters {
            self.filters = filters;
            self.revision += 1;
        }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn filters(&self) -> &PlaceFilters {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Monotonic change ticket; bumps whenever places or filters change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Places passing the active filters, in load order.
    pub fn filtered_places(&self) -> Vec<&Place> {
        self.places
            .iter()
            .filter(|place| self.filters.matches(place))
            .collect()
    }

    /// Distinct categories across the whole collection, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .places
            .iter()
            .map(|place| place.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Aggregate counts over the whole collection, ignoring filters.
    pub fn stats(&self) -> Stats {
        let mut stats = Stats::default();
        let mut by_category: HashMap<String, usize> = HashMap::new();

        for place in &self.places {
            stats.total += 1;
            match place.accessibility_status {
                AccessibilityStatus::Accessible => stats.accessible += 1,
                AccessibilityStatus::PartiallyAccessible => stats.partially_accessible += 1,
                AccessibilityStatus::NotAccessible => stats.not_accessible += 1,
                AccessibilityStatus::Unknown => stats.unknown += 1,
            }
            *by_category.entry(place.category.clone()).or_insert(0) += 1;
        }

        let mut by_category: Vec<(String, usize)> = by_category.into_iter().collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats.by_category = by_category;
        stats
    }

    /// Places within `radius_km` of a point, closest first, capped at
    /// `limit`.
    pub fn nearby(&self, origin: GeoPoint, radius_km: f64, limit: usize) -> Vec<(&Place, f64)> {
        let mut hits: Vec<(&Place, f64)> = self
            .places
            .iter()
            .map(|place| (place, origin.haversine_km(&place.position())))
            .filter(|(_, distance)| *distance <= radius_km)
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.truncate(limit);
        hits
    }

    /// Case-insensitive substring search over name, local name and
    /// address, sorted by name.
    pub fn search(&self, query: &str) -> Vec<&Place> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<&Place> = self
            .places
            .iter()
            .filter(|place| {
                place.name.to_lowercase().contains(&needle)
                    || place
                        .name_local
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
                    || place
                        .address
                        .as_deref()
                        .is_some_and(|address| address.to_lowercase().contains(&needle))
            })
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }

    /// Install a sanitized copy of the incoming collection. Records with
    /// out-of-range coordinates or a repeated id are dropped, keeping the
    /// first occurrence.
    fn replace_places(&mut self, incoming: Vec<Place>) {
        let total = incoming.len();
        let mut seen: HashSet<String> = HashSet::with_capacity(total);
        let mut places: Vec<Place> = Vec::with_capacity(total);

        for place in incoming {
            if !place.has_valid_position() {
                warn!(
                    "Dropping place {:?}: coordinates ({}, {}) out of range",
                    place.id, place.latitude, place.longitude
                );
                continue;
            }
            if !seen.insert(place.id.clone()) {
                warn!("Dropping duplicate place id {:?}", place.id);
                continue;
            }
            places.push(place);
        }

        let dropped = total - places.len();
        if dropped > 0 {
            info!("Dropped {dropped} of {total} places during sanitation");
        }

        self.places = places;
        self.revision += 1;
    }
}
