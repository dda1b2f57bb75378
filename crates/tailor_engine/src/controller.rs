use std::sync::{Arc, Mutex, PoisonError};

use tailor_core::{
    normalize_with_mount, update, AppState, AppViewModel, Effect, Msg, SubmissionId,
    SubmissionOutcome, SubmissionRequest, TRANSPORT_FAILURE_MESSAGE,
};
use tailor_logging::{tailor_error, tailor_warn};

use crate::SubmissionClient;

/// Receives a fresh view model after every state change that affects rendering.
///
/// `render` runs while the controller's state is locked; it must not call
/// back into the controller.
pub trait ViewSink: Send + Sync {
    fn render(&self, view: AppViewModel);
}

/// Drives one request/response cycle per `submit` call against a
/// [`SubmissionClient`] and keeps the resulting state for the view.
///
/// `submit` never fails: every error is folded into
/// `SubmissionOutcome::Failure`, and `pending` is cleared on every exit
/// path, including when the submit future is dropped before it resolves.
pub struct SubmissionController {
    client: Arc<dyn SubmissionClient>,
    state: Mutex<AppState>,
    sink: Option<Arc<dyn ViewSink>>,
}

impl SubmissionController {
    pub fn new(client: Arc<dyn SubmissionClient>) -> Self {
        Self {
            client,
            state: Mutex::new(AppState::new()),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ViewSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn view(&self) -> AppViewModel {
        self.lock_state().view()
    }

    pub fn pending(&self) -> bool {
        self.lock_state().pending()
    }

    pub fn outcome(&self) -> SubmissionOutcome {
        self.lock_state().outcome().clone()
    }

    /// Clears a displayed result. No effect while a submission is pending.
    pub fn dismiss(&self) {
        let effects = self.dispatch(Msg::BannerDismissed);
        debug_assert!(effects.is_empty());
    }

    /// Runs one full submission. Pending is set and the previous outcome
    /// cleared before the request is sent.
    pub async fn submit(&self, role: impl Into<String>, description: impl Into<String>) {
        let request = SubmissionRequest::new(role, description);
        for effect in self.dispatch(Msg::Submit { request }) {
            self.run_effect(effect).await;
        }
    }

    async fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::PostSubmission {
                submission_id,
                request,
            } => {
                let mut guard = ResolveGuard::new(self, submission_id);
                let outcome = match self.client.post_submission(&request).await {
                    Ok(link) => SubmissionOutcome::success(normalize_with_mount(
                        &link,
                        self.client.mount_path(),
                    )),
                    Err(err) => {
                        tailor_warn!("Submission #{} failed: {}", submission_id, err);
                        SubmissionOutcome::failure(err.user_message())
                    }
                };
                guard.resolve(outcome);
            }
        }
    }

    /// Renders under the state lock so overlapping submissions reach the
    /// sink in the same order their transitions were applied.
    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self.lock_state();
        let state = std::mem::take(&mut *guard);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        if let (true, Some(sink)) = (changed, self.sink.as_ref()) {
            sink.render(state.view());
        }
        *guard = state;
        effects
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Guarantees exactly one `SubmissionResolved` per started submission.
struct ResolveGuard<'a> {
    controller: &'a SubmissionController,
    submission_id: SubmissionId,
    resolved: bool,
}

impl<'a> ResolveGuard<'a> {
    fn new(controller: &'a SubmissionController, submission_id: SubmissionId) -> Self {
        Self {
            controller,
            submission_id,
            resolved: false,
        }
    }

    fn resolve(&mut self, outcome: SubmissionOutcome) {
        self.resolved = true;
        self.controller.dispatch(Msg::SubmissionResolved {
            submission_id: self.submission_id,
            outcome,
        });
    }
}

impl Drop for ResolveGuard<'_> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        tailor_error!(
            "Submission #{} ended without a response; marking it failed",
            self.submission_id
        );
        self.resolve(SubmissionOutcome::failure(TRANSPORT_FAILURE_MESSAGE));
    }
}
