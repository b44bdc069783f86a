use std::sync::Arc;

use archive_logging::archive_info;

use crate::view_model::AppViewModel;
use crate::{
    CatalogIndex, InputModeController, Resolution, ResolvedItem, SelectionEntry,
    SelectionResolver, SelectionSetManager,
};

/// State of the search/download action control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Selecting,
    Downloading,
}

/// How a batch ended, as far as the UI cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchResultKind {
    Completed,
    Offline,
    Failed,
}

/// Session state for one user: input modes, presented rows, checked
/// documents and action control. Owned by the host and threaded through
/// [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    catalog: Arc<CatalogIndex>,
    modes: InputModeController,
    selection: SelectionSetManager,
    action: ActionState,
    not_found_visible: bool,
    progress: Option<String>,
    server_online: bool,
    last_result: Option<BatchResultKind>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: impl Into<Arc<CatalogIndex>>) -> Self {
        Self {
            catalog: catalog.into(),
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn modes(&self) -> &InputModeController {
        &self.modes
    }

    pub fn selection(&self) -> &SelectionSetManager {
        &self.selection
    }

    pub fn action(&self) -> ActionState {
        self.action
    }

    pub fn server_online(&self) -> bool {
        self.server_online
    }

    pub fn view(&self) -> AppViewModel {
        let action_label = match self.action {
            ActionState::Idle => "SEARCH".to_string(),
            ActionState::Selecting => self.selection.action_label(),
            ActionState::Downloading => "DOWNLOADING...".to_string(),
        };
        AppViewModel {
            mode: self.modes.current_mode(),
            code_input: self.modes.code().to_string(),
            groups: self.catalog.group_names(),
            group_label: self.modes.group().map(str::to_string),
            item_label: self.modes.item().map(str::to_string),
            item_options: self.modes.item_options().to_vec(),
            item_picker_enabled: self.modes.item_picker_enabled(),
            rows_visible: self.selection.is_presented(),
            rows: self.selection.rows(),
            selected_count: self.selection.count(),
            action: self.action,
            action_label,
            action_enabled: self.action != ActionState::Downloading,
            progress: self.progress.clone(),
            not_found_visible: self.not_found_visible,
            server_online: self.server_online,
            last_result: self.last_result,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, then resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_downloading(&self) -> bool {
        self.action == ActionState::Downloading
    }

    pub(crate) fn edit_code(&mut self, text: &str) {
        if self.modes.activate_free_text(text) {
            self.collapse_selection();
        }
        self.mark_dirty();
    }

    pub(crate) fn choose_group(&mut self, group: &str) {
        let catalog = Arc::clone(&self.catalog);
        if self.modes.activate_structured(&catalog, group) {
            self.collapse_selection();
        }
        self.mark_dirty();
    }

    pub(crate) fn choose_item(&mut self, name: &str) {
        if self.modes.select_item(name) {
            self.collapse_selection();
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_row(&mut self, index: usize) {
        if self.selection.toggle(index).is_some() {
            self.action = ActionState::Selecting;
            self.mark_dirty();
        }
    }

    pub(crate) fn hide_not_found(&mut self) {
        if self.not_found_visible {
            self.not_found_visible = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn has_pending_batch(&self) -> bool {
        self.selection.is_presented() && self.selection.count() > 0
    }

    /// Resolves the current input and either presents the item's rows or
    /// shows the not-found message.
    pub(crate) fn search(&mut self) {
        let query = self.modes.query();
        let resolution = SelectionResolver::new(&self.catalog).resolve(&query);
        match resolution {
            Resolution::Found(resolved) => self.present(resolved),
            Resolution::NotFound => {
                self.collapse_selection();
                self.not_found_visible = true;
            }
        }
        self.mark_dirty();
    }

    /// Moves the action control to `Downloading` and hands back the snapshot
    /// the batch will work on.
    pub(crate) fn begin_batch(&mut self) -> Vec<SelectionEntry> {
        let entries = self.selection.snapshot();
        archive_info!("starting batch of {} document(s)", entries.len());
        self.action = ActionState::Downloading;
        self.progress = Some(String::new());
        self.last_result = None;
        self.mark_dirty();
        entries
    }

    pub(crate) fn set_progress(&mut self, text: String) {
        if self.is_downloading() {
            self.progress = Some(text);
            self.mark_dirty();
        }
    }

    /// The single reset routine every batch outcome converges on.
    pub(crate) fn finish_batch(&mut self, result: BatchResultKind) {
        archive_info!("batch finished: {:?}", result);
        self.action = ActionState::Idle;
        self.progress = None;
        self.selection.clear();
        self.last_result = Some(result);
        self.mark_dirty();
    }

    pub(crate) fn set_server_online(&mut self, online: bool) {
        if self.server_online != online {
            self.server_online = online;
            self.mark_dirty();
        }
    }

    fn present(&mut self, resolved: ResolvedItem) {
        if self.modes.current_mode() == crate::Mode::FreeText {
            let catalog = Arc::clone(&self.catalog);
            self.modes
                .mirror_structured(&catalog, &resolved.group, &resolved.item.name);
        }
        self.selection.present(resolved);
        self.action = ActionState::Selecting;
    }

    fn collapse_selection(&mut self) {
        self.selection.collapse();
        if self.action != ActionState::Downloading {
            self.action = ActionState::Idle;
        }
    }
}
