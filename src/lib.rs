//! Aasaan - client core for a community accessibility map
//!
//! This library provides the place data model, the loading and filtering
//! store, map synchronization, and contribution submission used by the
//! CLI binary.

pub mod client;
pub mod config;
pub mod contributions;
pub mod error;
pub mod map;
pub mod models;
pub mod store;

pub use client::{ApiClient, ContributionsApi, PlacesApi};
pub use config::ApiConfig;
pub use contributions::ContributionTracker;
pub use error::{FetchError, SubmitError, ValidationError};
pub use map::{MapEvent, MapSync, MapWidget};
pub use models::{AccessibilityStatus, ContributionData, Place, PlaceFilters};
pub use store::PlacesStore;
