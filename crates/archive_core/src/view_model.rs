use crate::{ActionState, BatchResultKind, DocumentRow, Mode};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mode: Mode,
    pub code_input: String,
    pub groups: Vec<String>,
    pub group_label: Option<String>,
    pub item_label: Option<String>,
    pub item_options: Vec<String>,
    pub item_picker_enabled: bool,
    pub rows_visible: bool,
    pub rows: Vec<DocumentRow>,
    pub selected_count: usize,
    pub action: ActionState,
    pub action_label: String,
    pub action_enabled: bool,
    /// `Some` while a batch runs; the text is the latest progress line.
    pub progress: Option<String>,
    pub not_found_visible: bool,
    pub server_online: bool,
    pub last_result: Option<BatchResultKind>,
    pub dirty: bool,
}
