use eddy_db::Collection;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog section a book is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cookbook,
    Coloring,
    Children,
    Story,
    Guide,
    Poetry,
    #[default]
    Other,
}

/// Book for sale or download. Stored documents carry an internal `_id` that
/// never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Book {
    /// Book title
    pub title: String,
    /// Optional subtitle
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Short marketing description
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    /// Price in USD, 0 for free
    #[serde(default)]
    #[validate(range(min = 0.0, message = "ensure this value is greater than or equal to 0"))]
    pub price: f64,
    /// URL to the cover image
    #[serde(default)]
    pub cover_url: Option<String>,
    /// Public sample PDF URL
    #[serde(default)]
    pub sample_url: Option<String>,
    /// Full book file URL
    #[serde(default)]
    pub download_url: Option<String>,
    /// Whether to show on the homepage
    #[serde(default)]
    pub featured: bool,
}

impl Collection for Book {
    const COLLECTION: &'static str = "book";
}

const DEFAULT_LIMIT: i64 = 50;

/// Query string of `GET /api/books`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListBooksQuery {
    /// Exact category to match; empty means no filter
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "ListBooksQuery::default_limit")]
    #[validate(range(min = 1, message = "ensure this value is greater than or equal to 1"))]
    pub limit: i64,
}

impl ListBooksQuery {
    fn default_limit() -> i64 {
        DEFAULT_LIMIT
    }

    /// Equality filter for the store, if a category was requested
    pub fn category_filter(&self) -> Option<eddy_db::Document> {
        let category = self.category.as_deref().filter(|c| !c.is_empty())?;
        let mut filter = eddy_db::Document::new();
        filter.insert("category".to_string(), category.into());
        Some(filter)
    }
}

impl Default for ListBooksQuery {
    fn default() -> Self {
        Self {
            category: None,
            limit: DEFAULT_LIMIT,
        }
    }
}
