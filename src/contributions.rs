//! Submission workflow for community contributions.

use tracing::info;

use crate::client::ContributionsApi;
use crate::error::SubmitError;
use crate::models::{ContributionData, ContributionReceipt};

/// Tracks one contribution form's lifecycle: idle, submitting, and the
/// outcome of the last attempt.
#[derive(Debug, Default)]
pub struct ContributionTracker {
    submitting: bool,
    error: Option<String>,
    success: bool,
}

impl ContributionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Human-readable message from the last failed attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.success
    }

    /// Validate and submit a contribution.
    ///
    /// A payload failing local validation is refused outright: nothing is
    /// sent and the tracker state stays as it was. Otherwise the outcome
    /// flags mirror the attempt, and the result is also returned so the
    /// caller can show the receipt or the error inline.
    pub async fn submit(
        &mut self,
        api: &impl ContributionsApi,
        data: &ContributionData,
    ) -> Result<ContributionReceipt, SubmitError> {
        data.validate()?;

        self.submitting = true;
        self.error = None;
        self.success = false;

        let result = api.submit_contribution(data).await;
        match &result {
            Ok(receipt) => {
                info!("Contribution accepted with id {}", receipt.id);
                self.success = true;
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }

        self.submitting = false;
        result
    }

    /// Clear the outcome flags ahead of the next attempt.
    pub fn reset(&mut self) {
        self.error = None;
        self.success = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::models::ContributionStatus;

    fn submission() -> ContributionData {
        ContributionData {
            name: "Shivaji Park".to_string(),
            category: "park".to_string(),
            latitude: 19.0282,
            longitude: 72.8387,
            ..Default::default()
        }
    }

    struct StubContributions {
        rejection: Option<(u16, &'static str)>,
    }

    impl ContributionsApi for StubContributions {
        async fn submit_contribution(
            &self,
            data: &ContributionData,
        ) -> Result<ContributionReceipt, SubmitError> {
            match self.rejection {
                Some((status, detail)) => Err(SubmitError::Rejected {
                    status,
                    detail: detail.to_string(),
                }),
                None => Ok(ContributionReceipt {
                    id: "c1".to_string(),
                    place_id: None,
                    contributor_name: data.contributor_name.clone(),
                    name: data.name.clone(),
                    category: data.category.clone(),
                    status: ContributionStatus::Pending,
                    created_at: "2024-03-01T10:15:00Z".to_string(),
                    reviewed_at: None,
                }),
            }
        }
    }

    /// Fails the test if anything reaches the network.
    struct UnreachableApi;

    impl ContributionsApi for UnreachableApi {
        async fn submit_contribution(
            &self,
            _data: &ContributionData,
        ) -> Result<ContributionReceipt, SubmitError> {
            panic!("submission should have been blocked by validation");
        }
    }

    #[tokio::test]
    async fn test_successful_submission_sets_success() {
        let api = StubContributions { rejection: None };
        let mut tracker = ContributionTracker::new();

        let receipt = tracker.submit(&api, &submission()).await.unwrap();
        assert_eq!(receipt.status, ContributionStatus::Pending);
        assert!(tracker.succeeded());
        assert!(!tracker.is_submitting());
        assert!(tracker.error().is_none());
    }

    #[tokio::test]
    async fn test_rejection_records_error_and_propagates() {
        let api = StubContributions {
            rejection: Some((409, "A similar place already exists")),
        };
        let mut tracker = ContributionTracker::new();

        let result = tracker.submit(&api, &submission()).await;
        assert!(matches!(
            result,
            Err(SubmitError::Rejected { status: 409, .. })
        ));
        assert_eq!(tracker.error(), Some("A similar place already exists"));
        assert!(!tracker.succeeded());
        assert!(!tracker.is_submitting());
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_the_network() {
        let mut tracker = ContributionTracker::new();
        let mut data = submission();
        data.name = "  ".to_string();

        let result = tracker.submit(&UnreachableApi, &data).await;
        assert!(matches!(
            result,
            Err(SubmitError::Invalid(ValidationError::MissingName))
        ));
        assert!(!tracker.is_submitting());
        assert!(!tracker.succeeded());
        assert!(tracker.error().is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_outcome_flags() {
        let api = StubContributions {
            rejection: Some((500, "Failed to submit contribution")),
        };
        let mut tracker = ContributionTracker::new();
        let _ = tracker.submit(&api, &submission()).await;
        assert!(tracker.error().is_some());

        tracker.reset();
        assert!(tracker.error().is_none());
        assert!(!tracker.succeeded());
    }

    #[tokio::test]
    async fn test_resubmission_clears_previous_outcome() {
        let mut tracker = ContributionTracker::new();

        let failing = StubContributions {
            rejection: Some((502, "Failed to submit contribution")),
        };
        let _ = tracker.submit(&failing, &submission()).await;
        assert!(tracker.error().is_some());

        let accepting = StubContributions { rejection: None };
        let _ = tracker.submit(&accepting, &submission()).await;
        assert!(tracker.error().is_none());
        assert!(tracker.succeeded());
    }
}
