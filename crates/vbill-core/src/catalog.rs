//! Bilingual item catalog and exact-match name resolution.
//!
//! The [`Catalog`] maps every accepted surface form (English, romanized Tamil,
//! Tamil script) to exactly one canonical [`ItemId`], and each id back to its
//! forms. Lookups fold case and collapse whitespace but otherwise demand an
//! exact match: no prefixes, no edit distance.
//!
//! The dictionary is a JSON document grouped by display category:
//!
//! ```json
//! { "categories": [ { "name": "Staples", "items": [ { "id": "rice", "forms": ["arisi"] } ] } ] }
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::ItemId;

/// The dictionary shipped with the crate.
pub const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Deserialize)]
struct CatalogDocument {
    categories: Vec<CategoryDocument>,
}

#[derive(Deserialize)]
struct CategoryDocument {
    name: String,
    #[serde(default)]
    native_name: Option<String>,
    items: Vec<EntryDocument>,
}

#[derive(Deserialize)]
struct EntryDocument {
    id: String,
    #[serde(default)]
    forms: Vec<String>,
}

/// One catalog item with every surface form that resolves to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    /// Display category the item is listed under.
    pub category: String,
    /// All accepted forms, canonical id first.
    pub forms: Vec<String>,
}

/// A display grouping of catalog items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Category label in Tamil script, if the dictionary provides one.
    pub native_name: Option<String>,
    /// Canonical ids in this category, sorted.
    pub items: Vec<ItemId>,
}

/// Immutable bilingual dictionary. Built once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<ItemId, CatalogEntry>,
    categories: Vec<Category>,
    forms: HashMap<String, ItemId>,
    /// Word count of the longest multi-word form.
    max_phrase_words: usize,
}

/// Lowercases a form and collapses internal whitespace.
pub fn fold_form(form: &str) -> String {
    form.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Catalog {
    /// Builds the embedded dictionary.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Builds a catalog from a dictionary document.
    ///
    /// Fails if the document is malformed, an id is blank or repeated, or
    /// one surface form is claimed by two different items.
    pub fn from_json(document: &str) -> Result<Self, CoreError> {
        let doc: CatalogDocument = serde_json::from_str(document)?;

        let mut entries = BTreeMap::new();
        let mut categories = Vec::with_capacity(doc.categories.len());
        let mut forms: HashMap<String, ItemId> = HashMap::new();
        let mut max_phrase_words = 1;

        for category in doc.categories {
            let mut items = Vec::with_capacity(category.items.len());
            for raw in category.items {
                let id_form = fold_form(&raw.id);
                if id_form.is_empty() {
                    return Err(CoreError::InvalidCatalog {
                        reason: format!("blank item id in category '{}'", category.name),
                    });
                }
                let id = ItemId(id_form.clone());
                if entries.contains_key(&id) {
                    return Err(CoreError::DuplicateItem { id: id.0 });
                }

                let mut entry_forms = vec![id_form];
                for form in raw.forms.iter().map(|f| fold_form(f)) {
                    if form.is_empty() {
                        return Err(CoreError::InvalidCatalog {
                            reason: format!("blank surface form for '{}'", id),
                        });
                    }
                    if !entry_forms.contains(&form) {
                        entry_forms.push(form);
                    }
                }

                for form in &entry_forms {
                    if let Some(existing) = forms.get(form) {
                        return Err(CoreError::DuplicateSurfaceForm {
                            form: form.clone(),
                            first: existing.0.clone(),
                            second: id.0.clone(),
                        });
                    }
                    max_phrase_words = max_phrase_words.max(form.split(' ').count());
                    forms.insert(form.clone(), id.clone());
                }

                items.push(id.clone());
                entries.insert(
                    id.clone(),
                    CatalogEntry {
                        id,
                        category: category.name.clone(),
                        forms: entry_forms,
                    },
                );
            }
            items.sort();
            categories.push(Category {
                name: category.name,
                native_name: category.native_name,
                items,
            });
        }

        Ok(Catalog {
            entries,
            categories,
            forms,
            max_phrase_words,
        })
    }

    /// Resolves a surface form to its canonical id.
    pub fn resolve(&self, form: &str) -> Option<&ItemId> {
        self.forms.get(&fold_form(form))
    }

    /// Finds the last catalog item mentioned in `words`.
    ///
    /// Scans from the end; at each end position the longest phrase wins, so
    /// "bell pepper" resolves to capsicum rather than pepper. Returns the id
    /// and the index of the phrase's first word.
    pub fn resolve_last(&self, words: &[&str]) -> Option<(ItemId, usize)> {
        for end in (1..=words.len()).rev() {
            let longest = self.max_phrase_words.min(end);
            for len in (1..=longest).rev() {
                let start = end - len;
                let phrase = words[start..end].join(" ");
                if let Some(id) = self.resolve(&phrase) {
                    return Some((id.clone(), start));
                }
            }
        }
        None
    }

    /// Returns every surface form of an item, canonical id first.
    pub fn forms_of(&self, id: &ItemId) -> Option<&[String]> {
        self.entries.get(id).map(|e| e.forms.as_slice())
    }

    pub fn entry(&self, id: &ItemId) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Categories in dictionary order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Filters categories down to items whose id or any surface form contains
    /// `term` (case-insensitive). Categories left empty are omitted. A blank
    /// term returns everything.
    ///
    /// For product browsing only; the parser never calls this.
    pub fn search(&self, term: &str) -> Vec<Category> {
        let needle = fold_form(term);
        self.categories
            .iter()
            .filter_map(|category| {
                let items: Vec<ItemId> = category
                    .items
                    .iter()
                    .filter(|id| {
                        needle.is_empty()
                            || self
                                .entries
                                .get(*id)
                                .is_some_and(|e| e.forms.iter().any(|f| f.contains(&needle)))
                    })
                    .cloned()
                    .collect();
                (!items.is_empty()).then(|| Category {
                    name: category.name.clone(),
                    native_name: category.native_name.clone(),
                    items,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> Catalog {
        Catalog::from_json(
            r#"{ "categories": [
                { "name": "Staples", "items": [
                    { "id": "Rice", "forms": ["arisi", "அரிசி"] },
                    { "id": "sona masuri" }
                ]},
                { "name": "Vegetables", "items": [
                    { "id": "pepper", "forms": ["milagu"] },
                    { "id": "capsicum", "forms": ["bell  pepper"] }
                ]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_all_languages_to_canonical_id() {
        let catalog = small_catalog();
        assert_eq!(catalog.resolve("rice"), Some(&ItemId::new("rice")));
        assert_eq!(catalog.resolve("ARISI"), Some(&ItemId::new("rice")));
        assert_eq!(catalog.resolve("அரிசி"), Some(&ItemId::new("rice")));
    }

    #[test]
    fn no_partial_or_fuzzy_matches() {
        let catalog = small_catalog();
        assert_eq!(catalog.resolve("ric"), None);
        assert_eq!(catalog.resolve("rices"), None);
        assert_eq!(catalog.resolve("aris"), None);
    }

    #[test]
    fn forms_round_trip_through_id() {
        let catalog = small_catalog();
        let forms = catalog.forms_of(&ItemId::new("rice")).unwrap();
        assert_eq!(forms, &["rice", "arisi", "அரிசி"]);
        for form in forms {
            assert_eq!(catalog.resolve(form), Some(&ItemId::new("rice")));
        }
    }

    #[test]
    fn resolve_last_prefers_latest_and_longest() {
        let catalog = small_catalog();
        let words = ["add", "rice", "bell", "pepper"];
        assert_eq!(
            catalog.resolve_last(&words),
            Some((ItemId::new("capsicum"), 2))
        );

        let words = ["pepper", "rice", "please"];
        assert_eq!(catalog.resolve_last(&words), Some((ItemId::new("rice"), 1)));

        let words = ["sona", "masuri"];
        assert_eq!(
            catalog.resolve_last(&words),
            Some((ItemId::new("sona masuri"), 0))
        );

        assert_eq!(catalog.resolve_last(&["xyz"]), None);
        assert_eq!(catalog.resolve_last(&[]), None);
    }

    #[test]
    fn duplicate_surface_form_rejected() {
        let err = Catalog::from_json(
            r#"{ "categories": [ { "name": "A", "items": [
                { "id": "curd", "forms": ["thayir"] },
                { "id": "yogurt", "forms": ["thayir"] }
            ]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateSurfaceForm { ref form, .. } if form == "thayir"));
    }

    #[test]
    fn duplicate_id_and_blank_id_rejected() {
        let err = Catalog::from_json(
            r#"{ "categories": [ { "name": "A", "items": [ { "id": "rice" }, { "id": "RICE" } ]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateItem { .. }));

        let err = Catalog::from_json(
            r#"{ "categories": [ { "name": "A", "items": [ { "id": "  " } ]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidCatalog { .. }));

        assert!(matches!(
            Catalog::from_json("not json").unwrap_err(),
            CoreError::Decode(_)
        ));
    }

    #[test]
    fn search_filters_categories() {
        let catalog = small_catalog();
        let hits = catalog.search("PEP");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Vegetables");
        assert_eq!(
            hits[0].items,
            vec![ItemId::new("capsicum"), ItemId::new("pepper")]
        );

        assert_eq!(catalog.search("arisi")[0].items, vec![ItemId::new("rice")]);
        assert!(catalog.search("zzz").is_empty());
        assert_eq!(catalog.search("").len(), 2);
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() > 100);
        assert_eq!(catalog.resolve("thakkali"), Some(&ItemId::new("tomato")));
        assert_eq!(catalog.resolve("பால்"), Some(&ItemId::new("milk")));
        assert_eq!(
            catalog.resolve("bottle gourd"),
            Some(&ItemId::new("bottle gourd"))
        );
        assert_eq!(catalog.categories().len(), 6);
    }
}
