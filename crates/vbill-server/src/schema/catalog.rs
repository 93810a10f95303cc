//! Catalog browsing types.

use serde::{Deserialize, Serialize};

use vbill_core::Category;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive search term matched against every surface form.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub categories: Vec<Category>,
    /// Number of items across the returned categories.
    pub item_count: usize,
}
