//! Resume tailor core: pure submission state machine and view-model helpers.
mod effect;
mod link;
mod msg;
mod outcome;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use link::{
    is_root_relative, normalize_download_link, normalize_with_mount, API_MOUNT_PATH,
};
pub use msg::Msg;
pub use outcome::{
    SubmissionId, SubmissionOutcome, SubmissionRequest, FAILED_TO_TAILOR_MESSAGE,
    TRANSPORT_FAILURE_MESSAGE, UNEXPECTED_RESPONSE_MESSAGE,
};
pub use state::{AppState, Phase};
pub use update::update;
pub use view_model::{AppViewModel, Banner, SUBMIT_LABEL, SUBMIT_LABEL_PENDING};
