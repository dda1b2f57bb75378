use crate::SubmissionOutcome;

pub const SUBMIT_LABEL: &str = "Tailor Resume";
pub const SUBMIT_LABEL_PENDING: &str = "Tailoring Resume...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub pending: bool,
    pub outcome: SubmissionOutcome,
    /// The trigger is disabled while a submission is in flight.
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub banner: Option<Banner>,
}

impl AppViewModel {
    pub(crate) fn label_for(pending: bool) -> &'static str {
        if pending {
            SUBMIT_LABEL_PENDING
        } else {
            SUBMIT_LABEL
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success {
        title: &'static str,
        text: &'static str,
        link: String,
    },
    Error {
        title: &'static str,
        message: String,
    },
}

impl Banner {
    pub(crate) fn from_outcome(outcome: &SubmissionOutcome) -> Option<Self> {
        match outcome {
            SubmissionOutcome::Success { download_url } => Some(Banner::Success {
                title: "Success",
                text: "Your tailored resume is ready.",
                link: download_url.clone(),
            }),
            SubmissionOutcome::Failure { message } => Some(Banner::Error {
                title: "Error",
                message: message.clone(),
            }),
            SubmissionOutcome::None => None,
        }
    }
}
