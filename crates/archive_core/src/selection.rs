use crate::{Document, ResolvedItem};

/// Owned snapshot of a checked document, taken when the row is toggled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub url: String,
    pub title: String,
    pub group_label: String,
    pub item_code: String,
    pub item_name: String,
    pub ordinal: usize,
}

impl SelectionEntry {
    fn snapshot(resolved: &ResolvedItem, ordinal: usize, document: &Document) -> Self {
        Self {
            url: document.url.clone(),
            title: document.title.clone(),
            group_label: resolved.group.clone(),
            item_code: resolved.item.code.clone(),
            item_name: resolved.item.name.clone(),
            ordinal,
        }
    }
}

/// Ordered set of checked documents, unique by URL. Order is toggle order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    entries: Vec<SelectionEntry>,
}

impl SelectionSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|entry| entry.url == url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<SelectionEntry> {
        self.entries.clone()
    }

    /// Adds the entry if its URL is absent, removes it otherwise. Returns
    /// whether the URL is a member afterwards.
    fn toggle(&mut self, entry: SelectionEntry) -> bool {
        match self.entries.iter().position(|e| e.url == entry.url) {
            Some(pos) => {
                self.entries.remove(pos);
                false
            }
            None => {
                self.entries.push(entry);
                true
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Rendered row for one document of the presented item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub index: usize,
    pub label: String,
    pub title: String,
    pub url: String,
    pub checked: bool,
}

/// Owns the presented item's rows and the set of checked documents.
///
/// A row's checked state is read from set membership, so the two cannot
/// drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSetManager {
    presented: Option<ResolvedItem>,
    set: SelectionSet,
}

impl SelectionSetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows one unchecked row per document of `item`.
    pub fn present(&mut self, item: ResolvedItem) {
        self.set.clear();
        self.presented = Some(item);
    }

    /// Flips the document at `index` in or out of the set and returns the new
    /// count, or `None` when no such row is shown.
    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        let resolved = self.presented.as_ref()?;
        let document = resolved.item.documents.get(index)?;
        let entry = SelectionEntry::snapshot(resolved, index, document);
        self.set.toggle(entry);
        Some(self.set.len())
    }

    /// Unchecks every row; rows stay visible.
    pub fn clear(&mut self) {
        self.set.clear();
    }

    /// Hides the rows and empties the set.
    pub fn collapse(&mut self) {
        self.set.clear();
        self.presented = None;
    }

    pub fn is_presented(&self) -> bool {
        self.presented.is_some()
    }

    pub fn presented(&self) -> Option<&ResolvedItem> {
        self.presented.as_ref()
    }

    pub fn count(&self) -> usize {
        self.set.len()
    }

    pub fn set(&self) -> &SelectionSet {
        &self.set
    }

    pub fn snapshot(&self) -> Vec<SelectionEntry> {
        self.set.to_vec()
    }

    pub fn rows(&self) -> Vec<DocumentRow> {
        let Some(resolved) = &self.presented else {
            return Vec::new();
        };
        let label = format!("{} ({})", resolved.item.name, resolved.item.code);
        resolved
            .item
            .documents
            .iter()
            .enumerate()
            .map(|(index, document)| DocumentRow {
                index,
                label: label.clone(),
                title: document.title.clone(),
                url: document.url.clone(),
                checked: self.set.contains(&document.url),
            })
            .collect()
    }

    /// Label for the action control while rows are shown.
    pub fn action_label(&self) -> String {
        match self.set.len() {
            0 => "DOWNLOAD".to_string(),
            n => format!("DOWNLOAD ({n})"),
        }
    }
}
