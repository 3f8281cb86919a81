use serde::Serialize;

use crate::domain::category::Category;

/// Row of the category grid: a projected record decorated with data looked
/// up in the full collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    pub is_active: bool,
    pub parent_id: Option<String>,
    /// `None` for top-level categories and for parents that no longer exist.
    pub parent_name: Option<String>,
    pub has_subcategories: bool,
    pub sort_order: i32,
}

impl CategoryDto {
    /// Builds the row for `category`, resolving relations against `all`.
    pub fn with_relations(category: Category, all: &[Category]) -> Self {
        let parent_name = category.parent_id.as_ref().and_then(|parent_id| {
            all.iter()
                .find(|c| c.id == *parent_id)
                .map(|c| c.name.to_string())
        });
        let has_subcategories = all.iter().any(|c| c.is_child_of(&category.id));
        Self {
            parent_name,
            has_subcategories,
            ..Self::from(category)
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.into_inner(),
            name: value.name.into_inner(),
            description: value.description,
            color: value.color.into_inner(),
            icon: value.icon.into_inner(),
            is_active: value.is_active,
            parent_id: value.parent_id.map(|id| id.into_inner()),
            parent_name: None,
            has_subcategories: false,
            sort_order: value.sort_order.get(),
        }
    }
}

/// What a delete confirmation needs to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteCategoryPreviewDto {
    pub id: String,
    pub name: String,
    /// Direct children that would be removed with the category.
    pub subcategory_names: Vec<String>,
}

impl DeleteCategoryPreviewDto {
    pub fn has_subcategories(&self) -> bool {
        !self.subcategory_names.is_empty()
    }
}

/// Entry of the parent picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentOptionDto {
    pub id: String,
    pub name: String,
}

impl From<Category> for ParentOptionDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.into_inner(),
            name: value.name.into_inner(),
        }
    }
}
