use crate::view_model::{AppViewModel, Banner};
use crate::{SubmissionId, SubmissionOutcome};

/// Coarse lifecycle position derived from `pending` and `outcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pending: bool,
    outcome: SubmissionOutcome,
    last_submission_id: SubmissionId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn outcome(&self) -> &SubmissionOutcome {
        &self.outcome
    }

    pub fn phase(&self) -> Phase {
        if self.pending {
            Phase::Pending
        } else if self.outcome.is_none() {
            Phase::Idle
        } else {
            Phase::Resolved
        }
    }

    /// Id handed to the most recently started submission; 0 before the first.
    pub fn last_submission_id(&self) -> SubmissionId {
        self.last_submission_id
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            pending: self.pending,
            outcome: self.outcome.clone(),
            submit_enabled: !self.pending,
            submit_label: AppViewModel::label_for(self.pending),
            banner: Banner::from_outcome(&self.outcome),
        }
    }

    /// Returns whether the view changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Enters the pending state and clears any previous result.
    pub(crate) fn begin_submission(&mut self) -> SubmissionId {
        self.last_submission_id += 1;
        self.pending = true;
        self.outcome = SubmissionOutcome::None;
        self.dirty = true;
        self.last_submission_id
    }

    pub(crate) fn resolve(&mut self, outcome: SubmissionOutcome) {
        self.pending = false;
        self.outcome = outcome;
        self.dirty = true;
    }

    pub(crate) fn dismiss_outcome(&mut self) -> bool {
        if self.pending || self.outcome.is_none() {
            return false;
        }
        self.outcome = SubmissionOutcome::None;
        self.dirty = true;
        true
    }
}
