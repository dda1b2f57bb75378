use std::sync::Once;

use pretty_assertions::assert_eq;
use tailor_core::{
    update, AppState, AppViewModel, Banner, Effect, Msg, Phase, SubmissionOutcome,
    SubmissionRequest, SUBMIT_LABEL, SUBMIT_LABEL_PENDING,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tailor_logging::initialize_for_tests);
}

fn submit(state: AppState, role: &str, description: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::Submit {
            request: SubmissionRequest::new(role, description),
        },
    )
}

fn resolve(state: AppState, submission_id: u64, outcome: SubmissionOutcome) -> AppState {
    let (state, effects) = update(
        state,
        Msg::SubmissionResolved {
            submission_id,
            outcome,
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn submit_enters_pending_and_emits_post() {
    init_logging();
    let (mut state, effects) = submit(AppState::new(), "Engineer", "Build things");

    assert_eq!(state.phase(), Phase::Pending);
    assert!(state.consume_dirty());
    assert_eq!(
        effects,
        vec![Effect::PostSubmission {
            submission_id: 1,
            request: SubmissionRequest::new("Engineer", "Build things"),
        }]
    );
    assert_eq!(
        state.view(),
        AppViewModel {
            pending: true,
            outcome: SubmissionOutcome::None,
            submit_enabled: false,
            submit_label: SUBMIT_LABEL_PENDING,
            banner: None,
        }
    );
}

#[test]
fn success_resolution_clears_pending_and_shows_link() {
    init_logging();
    let (state, _) = submit(AppState::new(), "Engineer", "Build things");
    let state = resolve(
        state,
        1,
        SubmissionOutcome::success("/api/py/download_resume/out.pdf"),
    );

    let view = state.view();
    assert_eq!(state.phase(), Phase::Resolved);
    assert!(!view.pending);
    assert!(view.submit_enabled);
    assert_eq!(view.submit_label, SUBMIT_LABEL);
    assert_eq!(
        view.banner,
        Some(Banner::Success {
            title: "Success",
            text: "Your tailored resume is ready.",
            link: "/api/py/download_resume/out.pdf".to_string(),
        })
    );
}

#[test]
fn failure_resolution_shows_error_banner() {
    init_logging();
    let (state, _) = submit(AppState::new(), "Engineer", "Build things");
    let state = resolve(state, 1, SubmissionOutcome::failure("Role is required"));

    assert!(!state.pending());
    assert_eq!(
        state.view().banner,
        Some(Banner::Error {
            title: "Error",
            message: "Role is required".to_string(),
        })
    );
}

#[test]
fn resubmitting_clears_previous_outcome_immediately() {
    init_logging();
    let (state, _) = submit(AppState::new(), "Engineer", "Build things");
    let state = resolve(state, 1, SubmissionOutcome::failure("boom"));

    let (state, effects) = submit(state, "Engineer", "Build better things");

    assert_eq!(state.phase(), Phase::Pending);
    assert_eq!(state.outcome(), &SubmissionOutcome::None);
    assert_eq!(state.view().banner, None);
    assert!(matches!(
        effects.as_slice(),
        [Effect::PostSubmission { submission_id: 2, .. }]
    ));
}

#[test]
fn overlapping_submissions_last_resolution_wins() {
    init_logging();
    let (state, _) = submit(AppState::new(), "First", "desc");
    let (state, _) = submit(state, "Second", "desc");
    assert_eq!(state.last_submission_id(), 2);

    // The newer request answers first, the older one last.
    let state = resolve(state, 2, SubmissionOutcome::success("/api/py/second.pdf"));
    let state = resolve(state, 1, SubmissionOutcome::failure("first failed"));

    assert!(!state.pending());
    assert_eq!(
        state.outcome(),
        &SubmissionOutcome::Failure {
            message: "first failed".to_string()
        }
    );
}

#[test]
fn dismissing_banner_returns_to_idle() {
    init_logging();
    let (state, _) = submit(AppState::new(), "Engineer", "Build things");
    let mut state = resolve(state, 1, SubmissionOutcome::success("/api/py/x.pdf"));
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::BannerDismissed);

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.view().banner, None);
}

#[test]
fn dismiss_is_ignored_while_pending() {
    init_logging();
    let (mut state, _) = submit(AppState::new(), "Engineer", "Build things");
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::BannerDismissed);

    assert_eq!(state.phase(), Phase::Pending);
    assert!(!state.consume_dirty());
}

#[test]
fn blank_failure_message_falls_back_to_retry_text() {
    assert_eq!(
        SubmissionOutcome::failure("  "),
        SubmissionOutcome::Failure {
            message: tailor_core::TRANSPORT_FAILURE_MESSAGE.to_string()
        }
    );
}
