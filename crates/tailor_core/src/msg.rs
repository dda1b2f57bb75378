use crate::{SubmissionId, SubmissionOutcome, SubmissionRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User triggered the form with the current role and description.
    Submit { request: SubmissionRequest },
    /// The engine finished one submission, successfully or not.
    SubmissionResolved {
        submission_id: SubmissionId,
        outcome: SubmissionOutcome,
    },
    /// User closed the success or error banner.
    BannerDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
