use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// A single downloadable artifact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    pub title: String,
    pub url: String,
}

/// A coded entity (e.g. a course) owning an ordered list of documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogItem {
    pub code: String,
    pub name: String,
    #[serde(rename = "downloads", default)]
    pub documents: Vec<Document>,
}

#[derive(Debug, Error)]
#[error("catalog is not valid JSON: {0}")]
pub struct CatalogParseError(#[from] serde_json::Error);

/// Read-only `group -> [item]` index.
///
/// Groups are kept in a `BTreeMap`, so every traversal (including free-text
/// lookup) visits groups in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct CatalogIndex {
    groups: BTreeMap<String, Vec<CatalogItem>>,
}

impl CatalogIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogParseError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_slice(raw: &[u8]) -> Result<Self, CatalogParseError> {
        Ok(serde_json::from_slice(raw)?)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[CatalogItem])> {
        self.groups
            .iter()
            .map(|(group, items)| (group.as_str(), items.as_slice()))
    }

    pub fn items(&self, group: &str) -> Option<&[CatalogItem]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Display names of the items in `group`, in catalog order.
    pub fn item_names(&self, group: &str) -> Vec<String> {
        self.items(group)
            .map(|items| items.iter().map(|item| item.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Case-insensitive exact code match; first hit in group order wins.
    pub fn find_by_code(&self, code: &str) -> Option<(&str, &CatalogItem)> {
        self.groups().find_map(|(group, items)| {
            items
                .iter()
                .find(|item| item.code.eq_ignore_ascii_case(code))
                .map(|item| (group, item))
        })
    }

    pub fn find_by_name(&self, group: &str, name: &str) -> Option<&CatalogItem> {
        self.items(group)?.iter().find(|item| item.name == name)
    }
}
