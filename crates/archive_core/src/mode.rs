use archive_logging::archive_debug;

use crate::CatalogIndex;

/// Which entry method is currently driving the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    None,
    FreeText,
    Structured,
}

/// The active mode together with the value the resolver should look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeQuery {
    None,
    FreeText(String),
    Structured {
        group: Option<String>,
        item: Option<String>,
    },
}

/// Tracks the two mutually exclusive input paths: a free-text code box and a
/// group/item drill-down.
///
/// Activating one path wipes the other's displayed value. Callers collapse the
/// rendered selection whenever an activation method returns `true`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputModeController {
    mode: Mode,
    code: String,
    group: Option<String>,
    item: Option<String>,
    item_options: Vec<String>,
}

impl InputModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    pub fn item_options(&self) -> &[String] {
        &self.item_options
    }

    /// The item picker only accepts input once a group is chosen.
    pub fn item_picker_enabled(&self) -> bool {
        self.group.is_some()
    }

    /// Records a code-box edit. Whitespace-only text is stored but does not
    /// switch modes.
    pub fn activate_free_text(&mut self, text: &str) -> bool {
        self.code = text.to_string();
        if text.trim().is_empty() {
            return false;
        }
        if self.mode != Mode::FreeText {
            archive_debug!("input mode -> free text");
        }
        self.mode = Mode::FreeText;
        self.clear_structured();
        true
    }

    /// Chooses a group in the drill-down, clearing the code box and any
    /// previously chosen item.
    pub fn activate_structured(&mut self, catalog: &CatalogIndex, group: &str) -> bool {
        if self.mode != Mode::Structured {
            archive_debug!("input mode -> structured (group={group})");
        }
        self.mode = Mode::Structured;
        self.code.clear();
        self.group = Some(group.to_string());
        self.item = None;
        self.item_options = catalog.item_names(group);
        true
    }

    /// Chooses an item inside the current group. Ignored while no group is
    /// selected.
    pub fn select_item(&mut self, name: &str) -> bool {
        if !self.item_picker_enabled() {
            return false;
        }
        self.mode = Mode::Structured;
        self.code.clear();
        self.item = Some(name.to_string());
        true
    }

    /// Shows where a free-text hit lives in the drill-down without leaving
    /// free-text mode.
    pub fn mirror_structured(&mut self, catalog: &CatalogIndex, group: &str, item: &str) {
        self.group = Some(group.to_string());
        self.item_options = catalog.item_names(group);
        self.item = Some(item.to_string());
    }

    pub fn query(&self) -> ModeQuery {
        match self.mode {
            Mode::None => ModeQuery::None,
            Mode::FreeText => ModeQuery::FreeText(self.code.clone()),
            Mode::Structured => ModeQuery::Structured {
                group: self.group.clone(),
                item: self.item.clone(),
            },
        }
    }

    fn clear_structured(&mut self) {
        self.group = None;
        self.item = None;
        self.item_options.clear();
    }
}
