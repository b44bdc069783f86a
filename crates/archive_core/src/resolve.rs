use archive_logging::archive_debug;

use crate::{CatalogIndex, CatalogItem, ModeQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub group: String,
    pub item: CatalogItem,
}

/// Outcome of a lookup. `NotFound` is an ordinary answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedItem),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

pub struct SelectionResolver<'a> {
    catalog: &'a CatalogIndex,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(catalog: &'a CatalogIndex) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, query: &ModeQuery) -> Resolution {
        let found = match query {
            ModeQuery::None => None,
            ModeQuery::FreeText(raw) => {
                let code = raw.trim();
                if code.is_empty() {
                    None
                } else {
                    self.catalog.find_by_code(code)
                }
            }
            ModeQuery::Structured {
                group: Some(group),
                item: Some(name),
            } => self
                .catalog
                .find_by_name(group, name)
                .map(|item| (group.as_str(), item)),
            ModeQuery::Structured { .. } => None,
        };

        match found {
            Some((group, item)) => {
                archive_debug!("resolved {} in group {}", item.code, group);
                Resolution::Found(ResolvedItem {
                    group: group.to_string(),
                    item: item.clone(),
                })
            }
            None => {
                archive_debug!("no catalog match for {:?}", query);
                Resolution::NotFound
            }
        }
    }
}
