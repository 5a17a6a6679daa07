//! Group and teacher list extraction.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{IdentityRecord, PageSelectors, SubjectKind};
use crate::services::Document;
use crate::utils::clean_text;
use crate::utils::html::parse_selector;

/// Extracts `{id, name}` records from the group and teacher list pages.
pub struct ListExtractor {
    group_item: Selector,
    teacher_item: Selector,
    id_attr: String,
}

impl ListExtractor {
    pub fn new(selectors: &PageSelectors) -> Result<Self> {
        Ok(Self {
            group_item: parse_selector(&selectors.group_item)?,
            teacher_item: parse_selector(&selectors.teacher_item)?,
            id_attr: selectors.id_attr.clone(),
        })
    }

    /// Parse a fetched list page.
    pub fn extract_page(&self, page: &Document, kind: SubjectKind) -> Vec<IdentityRecord> {
        self.extract(&page.html(), kind)
    }

    /// All items of `kind` in document order.
    ///
    /// Items without an id or with a blank name are dropped. A page that does
    /// not match the expected structure yields an empty list.
    pub fn extract(&self, document: &Html, kind: SubjectKind) -> Vec<IdentityRecord> {
        let item = match kind {
            SubjectKind::Group => &self.group_item,
            SubjectKind::Teacher => &self.teacher_item,
        };

        document
            .select(item)
            .filter_map(|el| {
                let id = el.value().attr(&self.id_attr)?.trim();
                let name = clean_text(&el.text().collect::<String>());
                if id.is_empty() || name.is_empty() {
                    return None;
                }
                Some(IdentityRecord::new(id, name))
            })
            .collect()
    }
}
