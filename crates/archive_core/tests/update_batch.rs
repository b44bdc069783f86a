mod common;

use archive_core::{update, ActionState, AppState, BatchResultKind, Effect, Msg};
use common::{apply, state};
use pretty_assertions::assert_eq;

fn with_two_checked() -> AppState {
    apply(
        state(),
        vec![
            Msg::GroupSelected("S5".to_string()),
            Msg::ItemSelected("Compilers".to_string()),
            Msg::ActionClicked,
            Msg::RowToggled(0),
            Msg::RowToggled(1),
        ],
    )
    .0
}

fn started() -> AppState {
    let (state, effects) = update(with_two_checked(), Msg::ActionClicked);
    assert_eq!(effects.len(), 1);
    state
}

#[test]
fn action_with_checked_rows_starts_a_batch_with_a_snapshot() {
    let (state, effects) = update(with_two_checked(), Msg::ActionClicked);

    let Effect::StartBatch { entries } = &effects[0];
    let urls: Vec<&str> = entries.iter().map(|entry| entry.url.as_str()).collect();
    assert_eq!(urls, vec!["https://x/?id=jkl", "https://x/?id=mno"]);

    let view = state.view();
    assert_eq!(view.action, ActionState::Downloading);
    assert_eq!(view.action_label, "DOWNLOADING...");
    assert!(!view.action_enabled);
    assert_eq!(view.progress.as_deref(), Some(""));
}

#[test]
fn input_is_ignored_while_downloading() {
    let state = started();
    let before = state.view();

    let (mut state, effects) = apply(
        state,
        vec![
            Msg::ActionClicked,
            Msg::RowToggled(2),
            Msg::RowToggled(0),
            Msg::CodeInputChanged("CS301".to_string()),
            Msg::GroupSelected("S3".to_string()),
            Msg::ItemSelected("Algorithms".to_string()),
        ],
    );

    assert!(effects.is_empty());
    let _ = state.consume_dirty();
    let mut after = state.view();
    after.dirty = before.dirty;
    assert_eq!(after, before);
}

#[test]
fn progress_text_is_shown_while_downloading() {
    let (state, _) = update(started(), Msg::BatchProgress("Getting info 1/2".to_string()));
    assert_eq!(state.view().progress.as_deref(), Some("Getting info 1/2"));

    let (state, _) = update(state, Msg::BatchProgress("Downloading: a.pdf".to_string()));
    assert_eq!(state.view().progress.as_deref(), Some("Downloading: a.pdf"));
}

#[test]
fn progress_outside_a_batch_is_dropped() {
    let (state, _) = update(with_two_checked(), Msg::BatchProgress("stray".to_string()));
    assert_eq!(state.view().progress, None);
}

#[test]
fn every_outcome_resets_to_idle_with_empty_selection() {
    for result in [
        BatchResultKind::Completed,
        BatchResultKind::Offline,
        BatchResultKind::Failed,
    ] {
        let (state, _) = apply(
            started(),
            vec![
                Msg::BatchProgress("Downloading: x.pdf".to_string()),
                Msg::BatchFinished(result),
            ],
        );
        let view = state.view();

        assert_eq!(view.action, ActionState::Idle);
        assert_eq!(view.action_label, "SEARCH");
        assert!(view.action_enabled);
        assert_eq!(view.progress, None);
        assert_eq!(view.selected_count, 0);
        assert!(view.rows.iter().all(|row| !row.checked));
        assert_eq!(view.last_result, Some(result));
    }
}

#[test]
fn rows_stay_visible_after_reset_and_can_be_reselected() {
    let (state, _) = apply(
        started(),
        vec![
            Msg::BatchFinished(BatchResultKind::Completed),
            Msg::RowToggled(2),
        ],
    );
    let view = state.view();

    assert!(view.rows_visible);
    assert_eq!(view.action, ActionState::Selecting);
    assert_eq!(view.action_label, "DOWNLOAD (1)");

    let (_state, effects) = update(state, Msg::ActionClicked);
    let Effect::StartBatch { entries } = &effects[0];
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].ordinal, 2);
}

#[test]
fn finish_without_a_running_batch_is_ignored() {
    let (state, _) = update(
        with_two_checked(),
        Msg::BatchFinished(BatchResultKind::Failed),
    );
    assert_eq!(state.view().selected_count, 2);
    assert_eq!(state.view().last_result, None);
}

#[test]
fn liveness_changes_are_reflected_in_the_view() {
    let (mut state, _) = update(state(), Msg::LivenessChanged(true));
    assert!(state.view().server_online);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::LivenessChanged(true));
    assert!(!state.consume_dirty());

    let (state, _) = update(state, Msg::LivenessChanged(false));
    assert!(!state.view().server_online);
}
