use crate::BatchResultKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the free-text code box.
    CodeInputChanged(String),
    /// User picked a group in the drill-down.
    GroupSelected(String),
    /// User picked an item inside the selected group.
    ItemSelected(String),
    /// User clicked the search/download action control.
    ActionClicked,
    /// User toggled the row for the document at this index.
    RowToggled(usize),
    /// Liveness probe result.
    LivenessChanged(bool),
    /// Progress text from the running batch.
    BatchProgress(String),
    /// The running batch ended, successfully or not.
    BatchFinished(BatchResultKind),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
