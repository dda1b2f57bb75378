use tailor_logging::{tailor_debug, tailor_info};

use crate::{AppState, Effect, Msg, SubmissionOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Submit { request } => {
            // Overlapping submissions are not coordinated here: the view
            // disables its trigger while pending, and if it does not, the
            // last resolution to arrive wins.
            if state.pending() {
                tailor_debug!(
                    "Submission started while #{} is still pending",
                    state.last_submission_id()
                );
            }
            let submission_id = state.begin_submission();
            tailor_info!(
                "Submission #{} started role_len={} description_len={}",
                submission_id,
                request.role.chars().count(),
                request.description.chars().count()
            );
            vec![Effect::PostSubmission {
                submission_id,
                request,
            }]
        }
        Msg::SubmissionResolved {
            submission_id,
            outcome,
        } => {
            if submission_id != state.last_submission_id() {
                tailor_debug!(
                    "Submission #{} resolved after newer #{}",
                    submission_id,
                    state.last_submission_id()
                );
            }
            tailor_info!(
                "Submission #{} resolved as {}",
                submission_id,
                outcome_kind(&outcome)
            );
            state.resolve(outcome);
            Vec::new()
        }
        Msg::BannerDismissed => {
            if state.dismiss_outcome() {
                tailor_debug!("Banner dismissed");
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn outcome_kind(outcome: &SubmissionOutcome) -> &'static str {
    match outcome {
        SubmissionOutcome::Success { .. } => "success",
        SubmissionOutcome::Failure { .. } => "failure",
        SubmissionOutcome::None => "none",
    }
}
