use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::types::CategoryId;
use crate::dto::categories::{CategoryDto, DeleteCategoryPreviewDto, ParentOptionDto};
use crate::forms::categories::{
    CategoryFormPayload, DeleteCategoryFormPayload, ReorderCategoryFormPayload,
    ToggleCategoryFormPayload,
};
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter, RepositoryError};

use super::{ServiceError, ServiceResult};

/// Categories matching `query`, ordered for display and decorated with
/// parent names.
pub fn show_categories<R>(query: CategoryListQuery, repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    let all = match repo.all_categories() {
        Ok(all) => all,
        Err(e) => {
            log::error!("Failed to load categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.list_categories(query) {
        Ok(visible) => Ok(visible
            .into_iter()
            .map(|c| CategoryDto::with_relations(c, &all))
            .collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Categories that may be chosen as parent of `editing` (every category but
/// itself), in display order.
pub fn show_parent_options<R>(
    editing: Option<&CategoryId>,
    repo: &R,
) -> ServiceResult<Vec<ParentOptionDto>>
where
    R: CategoryReader,
{
    match repo.list_categories(CategoryListQuery::new()) {
        Ok(categories) => Ok(categories
            .into_iter()
            .filter(|c| Some(&c.id) != editing)
            .map(ParentOptionDto::from)
            .collect()),
        Err(e) => {
            log::error!("Failed to list parent options: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Data for the delete confirmation of `category_id`.
pub fn show_delete_preview<R>(
    category_id: &CategoryId,
    repo: &R,
) -> ServiceResult<DeleteCategoryPreviewDto>
where
    R: CategoryReader,
{
    let category = get_existing(category_id, repo)?;

    match repo.list_children(category_id) {
        Ok(children) => Ok(DeleteCategoryPreviewDto {
            id: category.id.into_inner(),
            name: category.name.into_inner(),
            subcategory_names: children.into_iter().map(|c| c.name.into_inner()).collect(),
        }),
        Err(e) => {
            log::error!("Failed to list subcategories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Creates or updates a category from a validated form.
pub fn save_category<R>(payload: CategoryFormPayload, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    match payload {
        CategoryFormPayload::Create(new) => add_category(new, repo),
        CategoryFormPayload::Update {
            category_id,
            changes,
        } => update_category(&category_id, changes, repo),
    }
}

pub fn add_category<R>(category: NewCategory, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    if let Some(parent_id) = &category.parent_id {
        ensure_parent_exists(parent_id, repo)?;
    }

    match repo.create_category(&category) {
        Ok(created) => {
            log::info!("Created category {} ({})", created.id, created.name);
            Ok(created)
        }
        Err(RepositoryError::ValidationError(message)) => {
            log::error!("Rejected new category {}: {message}", category.name);
            Err(ServiceError::TypeConstraint(message))
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Replaces the mutable fields of `category_id`.
///
/// A parent reference is only checked when it changes, so a record orphaned
/// by a cascade delete can still be edited without picking a new parent.
pub fn update_category<R>(
    category_id: &CategoryId,
    changes: CategoryChanges,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter,
{
    let existing = get_existing(category_id, repo)?;

    if let Some(parent_id) = &changes.parent_id {
        if parent_id == category_id {
            return Err(ServiceError::Form(
                "A category cannot be its own parent.".to_string(),
            ));
        }
        if existing.parent_id.as_ref() != Some(parent_id) {
            ensure_parent_exists(parent_id, repo)?;
        }
    }

    match repo.update_category(category_id, &changes) {
        Ok(updated) => Ok(updated),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Deletes a category and its direct children.
///
/// Deleting an unknown id is not an error; the returned count is zero.
pub fn delete_category<R>(payload: DeleteCategoryFormPayload, repo: &R) -> ServiceResult<usize>
where
    R: CategoryWriter,
{
    match repo.delete_category(&payload.category_id) {
        Ok(removed) => {
            log::info!(
                "Deleted category {} ({removed} records removed)",
                payload.category_id
            );
            Ok(removed)
        }
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn set_category_active<R>(
    payload: ToggleCategoryFormPayload,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryWriter,
{
    match repo.set_category_active(&payload.category_id, payload.is_active) {
        Ok(updated) => Ok(updated),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update category status: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Applies a drag-and-drop move made against the list filtered by
/// `payload.search`. Returns the number of repositioned categories; zero
/// means the gesture resolved to no movement.
pub fn reorder_categories<R>(payload: ReorderCategoryFormPayload, repo: &R) -> ServiceResult<usize>
where
    R: CategoryWriter,
{
    let query = CategoryListQuery::new().search(payload.search);
    match repo.reorder_categories(&payload.category_move, &query) {
        Ok(changed) => {
            if changed > 0 && query.is_filtered() {
                log::warn!(
                    "Reordered {changed} categories under filter {:?}; hidden categories keep their positions",
                    query.search_text()
                );
            }
            Ok(changed)
        }
        Err(e) => {
            log::error!("Failed to reorder categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn get_existing<R>(category_id: &CategoryId, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn ensure_parent_exists<R>(parent_id: &CategoryId, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(parent_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Form(format!(
            "Parent category {parent_id} does not exist."
        ))),
        Err(e) => {
            log::error!("Failed to get parent category: {e}");
            Err(ServiceError::Internal)
        }
    }
}
