//! Public contribution payloads and the review receipt returned by the
//! backend.

use serde::{Deserialize, Serialize};

use super::place::{AccessibilityProfile, GeoPoint};
use crate::error::ValidationError;

/// A new-place (or place-edit) submission from a community member.
///
/// The wire shape mirrors a place record minus the server-assigned fields,
/// plus optional contributor identity and an optional target place id when
/// the submission amends an existing entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributionData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_local: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub accessibility: AccessibilityProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl ContributionData {
    /// Check the payload before it is allowed anywhere near the network.
    ///
    /// Name and category must be non-blank after trimming and the
    /// coordinates must lie inside the WGS84 range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let position = GeoPoint {
            lat: self.latitude,
            lon: self.longitude,
        };
        if !position.is_valid() {
            return Err(ValidationError::CoordinatesOutOfRange {
                lat: self.latitude,
                lon: self.longitude,
            });
        }
        Ok(())
    }
}

/// Moderation state of a submitted contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Acknowledgement returned by the backend for an accepted submission.
///
/// Timestamps stay as strings; the receipt is displayed, not computed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionReceipt {
    pub id: String,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub contributor_name: Option<String>,
    pub name: String,
    pub category: String,
    pub status: ContributionStatus,
    pub created_at: String,
    #[serde(default)]
    pub reviewed_at: Option<String>,
}
