use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        // A running batch owns the selection; nothing may touch it until the
        // batch reports back.
        Msg::CodeInputChanged(_)
        | Msg::GroupSelected(_)
        | Msg::ItemSelected(_)
        | Msg::ActionClicked
        | Msg::RowToggled(_)
            if state.is_downloading() =>
        {
            Vec::new()
        }
        Msg::CodeInputChanged(text) => {
            state.edit_code(&text);
            Vec::new()
        }
        Msg::GroupSelected(group) => {
            state.choose_group(&group);
            Vec::new()
        }
        Msg::ItemSelected(name) => {
            state.choose_item(&name);
            Vec::new()
        }
        Msg::RowToggled(index) => {
            state.toggle_row(index);
            Vec::new()
        }
        Msg::ActionClicked => {
            state.hide_not_found();
            if state.has_pending_batch() {
                let entries = state.begin_batch();
                vec![Effect::StartBatch { entries }]
            } else {
                state.search();
                Vec::new()
            }
        }
        Msg::LivenessChanged(online) => {
            state.set_server_online(online);
            Vec::new()
        }
        Msg::BatchProgress(text) => {
            state.set_progress(text);
            Vec::new()
        }
        Msg::BatchFinished(result) => {
            if state.is_downloading() {
                state.finish_batch(result);
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
