use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::reorder::CategoryMove;
use crate::domain::types::{
    CategoryId, CategoryName, HEX_COLOR_REGEX, HexColor, IconName, SortOrder, TypeConstraintError,
};

/// Value a parent picker submits for "no parent".
pub const NONE_PARENT_VALUE: &str = "__NONE__";

/// Validation messages keyed by form field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {}", format_field_errors(.0))]
    Validation(FieldErrors),
}

impl CategoryFormError {
    pub fn field_errors(&self) -> &FieldErrors {
        match self {
            Self::Validation(errors) => errors,
        }
    }
}

fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, field_errors) in value.field_errors() {
            let messages = errors.entry(field.to_string()).or_default();
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                messages.push(message);
            }
        }
        Self::Validation(errors)
    }
}

/// Collects typed-conversion failures under their form field.
#[derive(Default)]
struct FieldCollector {
    errors: FieldErrors,
}

impl FieldCollector {
    fn take<T>(&mut self, field: &str, result: Result<T, TypeConstraintError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(field, e.to_string());
                None
            }
        }
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    fn finish(self) -> Result<(), CategoryFormError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CategoryFormError::Validation(self.errors))
        }
    }
}

fn normalize_parent_id(value: Option<String>) -> Result<Option<CategoryId>, TypeConstraintError> {
    match value.as_deref().map(str::trim) {
        None | Some("") | Some(NONE_PARENT_VALUE) => Ok(None),
        Some(id) => CategoryId::new(id).map(Some),
    }
}

/// Create/edit form for a category. `id` is present when editing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CategoryForm {
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(regex(
        path = *HEX_COLOR_REGEX,
        message = "Color must be a valid hex code (e.g., #FFFFFF)."
    ))]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    pub is_active: bool,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[validate(range(min = 0, message = "Sort order must be zero or greater."))]
    #[serde(default)]
    pub sort_order: i32,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            color: HexColor::DEFAULT.to_string(),
            icon: IconName::DEFAULT.to_string(),
            is_active: true,
            parent_id: None,
            sort_order: 0,
        }
    }
}

impl CategoryForm {
    /// Form prefilled for editing `category`.
    pub fn from_category(category: &Category) -> Self {
        Self {
            id: Some(category.id.to_string()),
            name: category.name.to_string(),
            description: category.description.clone(),
            color: category.color.to_string(),
            icon: category.icon.to_string(),
            is_active: category.is_active,
            parent_id: category.parent_id.as_ref().map(ToString::to_string),
            sort_order: category.sort_order.get(),
        }
    }
}

/// Validated outcome of a [`CategoryForm`].
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryFormPayload {
    Create(NewCategory),
    Update {
        category_id: CategoryId,
        changes: CategoryChanges,
    },
}

impl CategoryFormPayload {
    /// The category name, for messages.
    pub fn name(&self) -> &CategoryName {
        match self {
            Self::Create(new) => &new.name,
            Self::Update { changes, .. } => &changes.name,
        }
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(mut value: CategoryForm) -> Result<Self, Self::Error> {
        value.name = value.name.trim().to_string();
        value.validate()?;

        let mut fields = FieldCollector::default();
        let category_id = fields.take(
            "id",
            value
                .id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .map(CategoryId::new)
                .transpose(),
        );
        let name = fields.take("name", CategoryName::new(value.name));
        let color = fields.take("color", HexColor::new(value.color));
        let icon = fields.take("icon", IconName::new(value.icon));
        let parent_id = fields.take("parent_id", normalize_parent_id(value.parent_id));
        let sort_order = fields.take("sort_order", SortOrder::new(value.sort_order));

        if let (Some(Some(id)), Some(Some(parent))) = (&category_id, &parent_id) {
            if id == parent {
                fields.push("parent_id", "A category cannot be its own parent.");
            }
        }
        fields.finish()?;

        // Every `take` succeeded once `finish` passes.
        let (
            Some(category_id),
            Some(name),
            Some(color),
            Some(icon),
            Some(parent_id),
            Some(sort_order),
        ) = (category_id, name, color, icon, parent_id, sort_order)
        else {
            return Err(CategoryFormError::Validation(FieldErrors::new()));
        };

        let description = value.description.trim().to_string();
        Ok(match category_id {
            None => Self::Create(NewCategory {
                name,
                description,
                color,
                icon,
                is_active: value.is_active,
                parent_id,
            }),
            Some(category_id) => Self::Update {
                category_id,
                changes: CategoryChanges {
                    name,
                    description,
                    color,
                    icon,
                    is_active: value.is_active,
                    parent_id,
                    sort_order,
                },
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteCategoryForm {
    #[validate(length(min = 1))]
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCategoryFormPayload {
    pub category_id: CategoryId,
}

impl TryFrom<DeleteCategoryForm> for DeleteCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: DeleteCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let mut fields = FieldCollector::default();
        let category_id = fields.take("category_id", CategoryId::new(value.category_id));
        fields.finish()?;
        match category_id {
            Some(category_id) => Ok(Self { category_id }),
            None => Err(CategoryFormError::Validation(FieldErrors::new())),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ToggleCategoryForm {
    #[validate(length(min = 1))]
    pub category_id: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleCategoryFormPayload {
    pub category_id: CategoryId,
    pub is_active: bool,
}

impl TryFrom<ToggleCategoryForm> for ToggleCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: ToggleCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let mut fields = FieldCollector::default();
        let category_id = fields.take("category_id", CategoryId::new(value.category_id));
        fields.finish()?;
        match category_id {
            Some(category_id) => Ok(Self {
                category_id,
                is_active: value.is_active,
            }),
            None => Err(CategoryFormError::Validation(FieldErrors::new())),
        }
    }
}

/// Drag-and-drop gesture: drop `source_id` onto `target_id` while `search`
/// is applied to the list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderCategoryForm {
    #[validate(length(min = 1))]
    pub source_id: String,
    #[validate(length(min = 1))]
    pub target_id: String,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReorderCategoryFormPayload {
    pub category_move: CategoryMove,
    pub search: String,
}

impl ReorderCategoryFormPayload {
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty()
    }
}

impl TryFrom<ReorderCategoryForm> for ReorderCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: ReorderCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let mut fields = FieldCollector::default();
        let source = fields.take("source_id", CategoryId::new(value.source_id));
        let target = fields.take("target_id", CategoryId::new(value.target_id));
        fields.finish()?;
        match (source, target) {
            (Some(source), Some(target)) => Ok(Self {
                category_move: CategoryMove { source, target },
                search: value.search,
            }),
            _ => Err(CategoryFormError::Validation(FieldErrors::new())),
        }
    }
}
