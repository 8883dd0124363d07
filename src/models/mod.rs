//! Core data models for the accessibility map.

pub mod contribution;
pub mod filters;
pub mod place;

pub use contribution::{ContributionData, ContributionReceipt, ContributionStatus};
pub use filters::PlaceFilters;
pub use place::{
    category_label, AccessibilityProfile, AccessibilityStatus, DataSource, GeoPoint, LevelSetting,
    Place, RestroomAccessibility,
};
