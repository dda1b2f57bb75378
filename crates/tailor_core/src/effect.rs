use crate::{SubmissionId, SubmissionRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the request to the tailor endpoint and report back with
    /// `Msg::SubmissionResolved` carrying the same id.
    PostSubmission {
        submission_id: SubmissionId,
        request: SubmissionRequest,
    },
}
