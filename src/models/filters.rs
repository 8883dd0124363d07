//! Read-side filter criteria applied to the loaded place collection.

use serde::{Deserialize, Serialize};

use super::place::{AccessibilityStatus, Place, RestroomAccessibility};

/// A set of optional predicates narrowing the displayed place list.
///
/// `None` means "no constraint"; an empty allow-list is treated the same.
/// Feature wants at `Some(false)` are inert, mirroring unchecked toggles.
/// Filter values are replaced wholesale, never merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_status: Option<Vec<AccessibilityStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp_present: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_free_entrance: Option<bool>,
    /// Wanting a restroom passes any place whose grading is not `none`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessible_restroom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tactile_paving: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_signage: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub braille_signage: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_assistance_available: Option<bool>,
}

impl PlaceFilters {
    /// Evaluate every active constraint against one place (logical AND).
    pub fn matches(&self, place: &Place) -> bool {
        if let Some(statuses) = &self.accessibility_status {
            if !statuses.is_empty() && !statuses.contains(&place.accessibility_status) {
                return false;
            }
        }

        if let Some(categories) = &self.category {
            if !categories.is_empty() && !categories.iter().any(|c| c == &place.category) {
                return false;
            }
        }

        let wants = &place.accessibility;
        if self.ramp_present == Some(true) && !wants.ramp_present {
            return false;
        }
        if self.step_free_entrance == Some(true) && !wants.step_free_entrance {
            return false;
        }
        if self.accessible_restroom == Some(true)
            && wants.accessible_restroom == RestroomAccessibility::None
        {
            return false;
        }
        if self.tactile_paving == Some(true) && !wants.tactile_paving {
            return false;
        }
        if self.audio_signage == Some(true) && !wants.audio_signage {
            return false;
        }
        if self.braille_signage == Some(true) && !wants.braille_signage {
            return false;
        }
        if self.staff_assistance_available == Some(true) && !wants.staff_assistance_available {
            return false;
        }

        true
    }

    /// Whether the filter set imposes no constraint at all.
    pub fn is_unconstrained(&self) -> bool {
        self.accessibility_status
            .as_ref()
            .map_or(true, |s| s.is_empty())
            && self.category.as_ref().map_or(true, |c| c.is_empty())
            && self.ramp_present != Some(true)
            && self.step_free_entrance != Some(true)
            && self.accessible_restroom != Some(true)
            && self.tactile_paving != Some(true)
            && self.audio_signage != Some(true)
            && self.braille_signage != Some(true)
            && self.staff_assistance_available != Some(true)
    }
}
