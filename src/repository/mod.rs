use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::reorder::CategoryMove;
use crate::domain::types::CategoryId;

pub mod errors;
pub mod memory;

pub use errors::{RepositoryError, RepositoryResult};
pub use memory::MemoryRepository;

/// Query parameters for listing categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryListQuery {
    /// Free-text filter matched against name and description.
    pub search: Option<String>,
}

impl CategoryListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    /// The filter text, empty when no filter is applied.
    pub fn search_text(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    pub fn is_filtered(&self) -> bool {
        self.search.is_some()
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// The projected view for `query`.
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>>;
    /// Every stored category in collection order, ignoring `sort_order`.
    fn all_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>>;
    /// Direct children of `id`.
    fn list_children(&self, id: &CategoryId) -> RepositoryResult<Vec<Category>>;
    /// Whether any category names `id` as its parent.
    fn has_children(&self, id: &CategoryId) -> RepositoryResult<bool> {
        Ok(!self.list_children(id)?.is_empty())
    }
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Insert a new category at the end of the global order.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Replace all mutable fields of an existing category.
    fn update_category(
        &self,
        id: &CategoryId,
        changes: &CategoryChanges,
    ) -> RepositoryResult<Category>;
    /// Delete a category and its direct children. Returns the number removed.
    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize>;
    /// Set the active flag of a category.
    fn set_category_active(&self, id: &CategoryId, is_active: bool) -> RepositoryResult<Category>;
    /// Apply a drag-and-drop move made against the view for `query`.
    /// Returns the number of categories whose position was rewritten.
    fn reorder_categories(
        &self,
        category_move: &CategoryMove,
        query: &CategoryListQuery,
    ) -> RepositoryResult<usize>;
}
