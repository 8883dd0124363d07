//! Place document structure and accessibility enumerations.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse accessibility classification driving marker color and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AccessibilityStatus {
    Accessible,
    PartiallyAccessible,
    NotAccessible,
    #[default]
    Unknown,
}

impl AccessibilityStatus {
    /// All statuses, in display order.
    pub const ALL: [AccessibilityStatus; 4] = [
        AccessibilityStatus::Accessible,
        AccessibilityStatus::PartiallyAccessible,
        AccessibilityStatus::NotAccessible,
        AccessibilityStatus::Unknown,
    ];

    /// Wire name (snake_case), also used for CLI arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessibilityStatus::Accessible => "accessible",
            AccessibilityStatus::PartiallyAccessible => "partially_accessible",
            AccessibilityStatus::NotAccessible => "not_accessible",
            AccessibilityStatus::Unknown => "unknown",
        }
    }

    /// Human-readable badge label.
    pub fn label(&self) -> &'static str {
        match self {
            AccessibilityStatus::Accessible => "Accessible",
            AccessibilityStatus::PartiallyAccessible => "Partially Accessible",
            AccessibilityStatus::NotAccessible => "Not Accessible",
            AccessibilityStatus::Unknown => "Unknown",
        }
    }

    /// Marker color (CSS hex). Unknown doubles as the fallback style.
    pub fn color(&self) -> &'static str {
        match self {
            AccessibilityStatus::Accessible => "#22c55e",
            AccessibilityStatus::PartiallyAccessible => "#eab308",
            AccessibilityStatus::NotAccessible => "#ef4444",
            AccessibilityStatus::Unknown => "#9ca3af",
        }
    }
}

impl From<String> for AccessibilityStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "accessible" => AccessibilityStatus::Accessible,
            "partially_accessible" => AccessibilityStatus::PartiallyAccessible,
            "not_accessible" => AccessibilityStatus::NotAccessible,
            _ => AccessibilityStatus::Unknown,
        }
    }
}

impl std::fmt::Display for AccessibilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restroom accessibility grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RestroomAccessibility {
    #[default]
    None,
    Partial,
    Full,
}

impl RestroomAccessibility {
    /// Wire name, as shown on the details view.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestroomAccessibility::None => "none",
            RestroomAccessibility::Partial => "partial",
            RestroomAccessibility::Full => "full",
        }
    }
}

impl From<String> for RestroomAccessibility {
    fn from(value: String) -> Self {
        match value.as_str() {
            "partial" => RestroomAccessibility::Partial,
            "full" => RestroomAccessibility::Full,
            _ => RestroomAccessibility::None,
        }
    }
}

/// Three-step setting used for lighting and noise levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum LevelSetting {
    Low,
    #[default]
    Medium,
    High,
}

impl LevelSetting {
    /// Wire name, as shown on the details view.
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelSetting::Low => "low",
            LevelSetting::Medium => "medium",
            LevelSetting::High => "high",
        }
    }
}

impl From<String> for LevelSetting {
    fn from(value: String) -> Self {
        match value.as_str() {
            "low" => LevelSetting::Low,
            "high" => LevelSetting::High,
            _ => LevelSetting::Medium,
        }
    }
}

/// Provenance of a place record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum DataSource {
    User,
    #[default]
    Manual,
    Osm,
}

impl DataSource {
    /// Provenance wording used on the details view.
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::User => "Community",
            DataSource::Manual => "Official",
            DataSource::Osm => "OpenStreetMap",
        }
    }
}

impl From<String> for DataSource {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => DataSource::User,
            "osm" => DataSource::Osm,
            _ => DataSource::Manual,
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::User => write!(f, "user"),
            DataSource::Manual => write!(f, "manual"),
            DataSource::Osm => write!(f, "osm"),
        }
    }
}

/// Geographic point (lat/lon, WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

const EARTH_RADIUS_KM: f64 = 6371.0;

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the point lies within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to another point, in kilometers.
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        // Rounding can push `a` just past 1 for near-antipodal pairs.
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

/// The accessibility attribute block shared by places and contributions.
///
/// Flattened into the parent record, so the JSON stays flat on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccessibilityProfile {
    #[serde(default)]
    pub ramp_present: bool,
    #[serde(default)]
    pub step_free_entrance: bool,
    #[serde(default)]
    pub accessible_restroom: RestroomAccessibility,
    #[serde(default)]
    pub tactile_paving: bool,
    #[serde(default)]
    pub audio_signage: bool,
    #[serde(default)]
    pub braille_signage: bool,
    #[serde(default)]
    pub lighting_level: LevelSetting,
    #[serde(default)]
    pub noise_level: LevelSetting,
    #[serde(default)]
    pub staff_assistance_available: bool,
}

/// Number of criteria considered by [`AccessibilityProfile::score`].
const SCORE_CRITERIA: u32 = 6;

impl AccessibilityProfile {
    /// Count of satisfied accessibility criteria (0..=6).
    ///
    /// Audio and braille signage count as a single signage criterion; a
    /// restroom counts once it is at least partially accessible.
    pub fn score(&self) -> u32 {
        let mut score = 0;
        if self.ramp_present {
            score += 1;
        }
        if self.step_free_entrance {
            score += 1;
        }
        if self.accessible_restroom != RestroomAccessibility::None {
            score += 1;
        }
        if self.tactile_paving {
            score += 1;
        }
        if self.audio_signage || self.braille_signage {
            score += 1;
        }
        if self.staff_assistance_available {
            score += 1;
        }
        score
    }

    /// Classify the profile using the review pipeline's thresholds:
    /// 70% of criteria → accessible, 30% → partially accessible, anything
    /// above zero → not accessible, nothing reported → unknown.
    pub fn derived_status(&self) -> AccessibilityStatus {
        let score = self.score();
        let ratio = f64::from(score) / f64::from(SCORE_CRITERIA);

        if ratio >= 0.7 {
            AccessibilityStatus::Accessible
        } else if ratio >= 0.3 {
            AccessibilityStatus::PartiallyAccessible
        } else if score > 0 {
            AccessibilityStatus::NotAccessible
        } else {
            AccessibilityStatus::Unknown
        }
    }
}

/// A point of interest with accessibility metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Opaque unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Name in the local script, if different.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_local: Option<String>,

    /// Open-ended category key (e.g. "railway_station"); unknown keys are
    /// displayed through [`category_label`]'s fallback.
    pub category: String,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Accessibility attributes (flat on the wire).
    #[serde(flatten)]
    pub accessibility: AccessibilityProfile,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    /// Assigned classification; anything unrecognized decodes to unknown.
    #[serde(default)]
    pub accessibility_status: AccessibilityStatus,

    /// ISO-8601 timestamp, kept opaque; see [`Place::last_updated`].
    #[serde(default)]
    pub updated_at: String,

    #[serde(default)]
    pub source: DataSource,
}

impl Place {
    /// The place's coordinates as a point.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Whether the coordinates are placeable on a WGS84 map.
    pub fn has_valid_position(&self) -> bool {
        self.position().is_valid()
    }

    /// Lenient parse of `updated_at` for display and ordering.
    ///
    /// Accepts RFC 3339 with offset as well as the naive form some exports
    /// carry; unparsable values yield `None` rather than an error.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.updated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&self.updated_at, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }
}

/// Display label for a category key.
///
/// Total over all inputs: known keys map to the curated label table, anything
/// else falls back to the raw key.
pub fn category_label(category: &str) -> &str {
    match category {
        "railway_station" => "🚂 Railway Station",
        "metro_station" => "🚇 Metro Station",
        "monument" => "🏛️ Monument",
        "hospital" => "🏥 Hospital",
        "bank" => "🏦 Bank",
        "public_space" => "🌳 Public Space",
        "religious" => "🛕 Religious",
        "govt_office" => "🏢 Government Office",
        "sports" => "🏟️ Sports",
        "transport" => "🚗 Transport",
        "shopping" => "🛒 Shopping",
        "museum" => "🎨 Museum",
        "market" => "🛍️ Market",
        "school" => "🎓 School/College",
        "cultural" => "🎭 Cultural",
        "airport" => "✈️ Airport",
        "park" => "🌲 Park",
        "library" => "📚 Library",
        "business" => "💼 Business",
        "neighborhood" => "🏘️ Neighborhood",
        other => other,
    }
}
