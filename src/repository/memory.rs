use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDateTime, Utc};
use tokio::sync::watch;

use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::projection::project;
use crate::domain::reorder::{self, CategoryMove};
use crate::domain::types::{CategoryId, SortOrder};
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, RepositoryError, RepositoryResult,
};

/// The authoritative in-memory category collection.
///
/// Every successful mutation publishes a snapshot of the full collection to
/// subscribers obtained from [`MemoryRepository::subscribe`].
pub struct MemoryRepository {
    categories: RwLock<Vec<Category>>,
    snapshots: watch::Sender<Vec<Category>>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryRepository {
    /// Create a repository holding `categories` in the given order.
    pub fn new(categories: Vec<Category>) -> Self {
        let (snapshots, _) = watch::channel(categories.clone());
        Self {
            categories: RwLock::new(categories),
            snapshots,
        }
    }

    /// Receiver that observes the full collection after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Category>> {
        self.snapshots.subscribe()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Vec<Category>>> {
        self.categories.read().map_err(|_| RepositoryError::Poisoned)
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Vec<Category>>> {
        self.categories.write().map_err(|_| RepositoryError::Poisoned)
    }

    fn publish(&self, categories: &[Category]) {
        self.snapshots.send_replace(categories.to_vec());
    }

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn find_mut<'a>(
        categories: &'a mut [Category],
        id: &CategoryId,
    ) -> RepositoryResult<&'a mut Category> {
        categories
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or(RepositoryError::NotFound)
    }
}

impl CategoryReader for MemoryRepository {
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>> {
        let categories = self.read()?;
        Ok(project(categories.iter(), query.search_text()))
    }

    fn all_categories(&self) -> RepositoryResult<Vec<Category>> {
        Ok(self.read()?.clone())
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self.read()?.iter().find(|c| c.id == *id).cloned())
    }

    fn list_children(&self, id: &CategoryId) -> RepositoryResult<Vec<Category>> {
        Ok(self
            .read()?
            .iter()
            .filter(|c| c.is_child_of(id))
            .cloned()
            .collect())
    }
}

impl CategoryWriter for MemoryRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut categories = self.write()?;

        let mut id = CategoryId::generate();
        while categories.iter().any(|c| c.id == id) {
            id = CategoryId::generate();
        }
        let sort_order = categories
            .iter()
            .map(|c| c.sort_order)
            .max()
            .map(SortOrder::next)
            .transpose()?
            .unwrap_or_default();

        let created = category.clone().into_category(id, sort_order, Self::now());
        categories.push(created.clone());
        self.publish(&categories);
        Ok(created)
    }

    fn update_category(
        &self,
        id: &CategoryId,
        changes: &CategoryChanges,
    ) -> RepositoryResult<Category> {
        let mut categories = self.write()?;
        let category = Self::find_mut(&mut categories, id)?;
        category.apply(changes.clone(), Self::now());
        let updated = category.clone();
        self.publish(&categories);
        Ok(updated)
    }

    fn delete_category(&self, id: &CategoryId) -> RepositoryResult<usize> {
        let mut categories = self.write()?;
        let before = categories.len();
        categories.retain(|c| c.id != *id && !c.is_child_of(id));
        let removed = before - categories.len();
        if removed > 0 {
            self.publish(&categories);
        }
        Ok(removed)
    }

    fn set_category_active(&self, id: &CategoryId, is_active: bool) -> RepositoryResult<Category> {
        let mut categories = self.write()?;
        let category = Self::find_mut(&mut categories, id)?;
        category.is_active = is_active;
        category.updated_at = Self::now();
        let updated = category.clone();
        self.publish(&categories);
        Ok(updated)
    }

    fn reorder_categories(
        &self,
        category_move: &CategoryMove,
        query: &CategoryListQuery,
    ) -> RepositoryResult<usize> {
        let mut categories = self.write()?;
        let visible = project(categories.iter(), query.search_text());
        let Some(plan) = reorder::plan(&visible, category_move) else {
            return Ok(0);
        };
        let changed = plan.apply_to(&mut categories);
        self.publish(&categories);
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::category;
    use crate::domain::types::{CategoryName, HexColor, IconName};
    use std::collections::HashSet;

    fn id(value: &str) -> CategoryId {
        CategoryId::new(value).unwrap()
    }

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: CategoryName::new(name).unwrap(),
            description: String::new(),
            color: HexColor::default(),
            icon: IconName::default(),
            is_active: true,
            parent_id: None,
        }
    }

    fn child(id: &str, name: &str, parent: &str, sort_order: i32) -> Category {
        let mut c = category(id, name, "", sort_order);
        c.parent_id = Some(CategoryId::new(parent).unwrap());
        c
    }

    #[test]
    fn create_assigns_unique_id_and_next_sort_order() {
        let repo = MemoryRepository::new(vec![
            category("1", "Electronics", "", 0),
            category("2", "Books", "", 5),
        ]);

        let created = repo.create_category(&new_category("Garden")).unwrap();
        assert_eq!(created.sort_order, 6);
        assert_eq!(created.created_at, created.updated_at);

        let ids: HashSet<_> = repo
            .all_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn create_after_highest_possible_sort_order_is_rejected() {
        let repo = MemoryRepository::new(vec![category("a", "Alpha", "", i32::MAX)]);
        let rx = repo.subscribe();

        let err = repo.create_category(&new_category("Garden")).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::ValidationError("sort_order is out of range".to_string())
        );
        assert_eq!(repo.all_categories().unwrap().len(), 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn create_in_empty_store_starts_at_zero() {
        let repo = MemoryRepository::default();
        let created = repo.create_category(&new_category("Garden")).unwrap();
        assert_eq!(created.sort_order, 0);
    }

    #[test]
    fn delete_cascades_one_level_only() {
        let repo = MemoryRepository::new(vec![
            category("a", "Alpha", "", 0),
            child("b", "Bravo", "a", 1),
            child("c", "Charlie", "b", 2),
            category("d", "Delta", "", 3),
        ]);

        assert_eq!(repo.delete_category(&id("a")).unwrap(), 2);
        let remaining: Vec<_> = repo
            .all_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.id.into_inner())
            .collect();
        assert_eq!(remaining, vec!["c", "d"]);

        let orphan = repo.get_category_by_id(&id("c")).unwrap().unwrap();
        assert_eq!(orphan.parent_id, Some(id("b")));
    }

    #[test]
    fn delete_is_idempotent() {
        let repo = MemoryRepository::new(vec![category("a", "Alpha", "", 0)]);
        assert_eq!(repo.delete_category(&id("a")).unwrap(), 1);
        assert_eq!(repo.delete_category(&id("a")).unwrap(), 0);
        assert!(repo.all_categories().unwrap().is_empty());
    }

    #[test]
    fn toggling_changes_only_active_flag_and_timestamp() {
        let original = category("a", "Alpha", "first", 0);
        let repo = MemoryRepository::new(vec![original.clone()]);

        let toggled = repo.set_category_active(&id("a"), false).unwrap();
        assert!(!toggled.is_active);
        assert!(toggled.updated_at >= original.updated_at);

        let mut expected = original;
        expected.is_active = false;
        expected.updated_at = toggled.updated_at;
        assert_eq!(toggled, expected);
    }

    #[test]
    fn update_and_toggle_report_missing_ids() {
        let repo = MemoryRepository::default();
        assert_eq!(
            repo.set_category_active(&id("missing"), true).unwrap_err(),
            RepositoryError::NotFound
        );
        let changes = CategoryChanges {
            name: CategoryName::new("Garden").unwrap(),
            description: String::new(),
            color: HexColor::default(),
            icon: IconName::default(),
            is_active: true,
            parent_id: None,
            sort_order: SortOrder::default(),
        };
        assert_eq!(
            repo.update_category(&id("missing"), &changes).unwrap_err(),
            RepositoryError::NotFound
        );
    }

    #[test]
    fn reorder_unfiltered_normalizes_whole_store() {
        let repo = MemoryRepository::new(vec![
            category("a", "Alpha", "", 0),
            category("b", "Bravo", "", 4),
            category("c", "Charlie", "", 9),
        ]);
        let mv = CategoryMove {
            source: id("c"),
            target: id("a"),
        };
        assert_eq!(
            repo.reorder_categories(&mv, &CategoryListQuery::new())
                .unwrap(),
            3
        );
        let view = repo.list_categories(CategoryListQuery::new()).unwrap();
        let ordered: Vec<_> = view
            .into_iter()
            .map(|c| (c.id.into_inner(), c.sort_order.get()))
            .collect();
        assert_eq!(
            ordered,
            vec![
                ("c".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 2)
            ]
        );
    }

    #[test]
    fn reorder_leaves_updated_at_untouched() {
        let repo = MemoryRepository::new(vec![
            category("a", "Alpha", "", 0),
            category("b", "Bravo", "", 1),
        ]);
        let mv = CategoryMove {
            source: id("b"),
            target: id("a"),
        };
        repo.reorder_categories(&mv, &CategoryListQuery::new())
            .unwrap();
        let moved = repo.get_category_by_id(&id("b")).unwrap().unwrap();
        assert_eq!(moved.sort_order, 0);
        assert_eq!(moved.updated_at, moved.created_at);
    }

    #[test]
    fn reorder_with_hidden_source_is_a_no_op() {
        let repo = MemoryRepository::new(vec![
            category("a", "Alpha", "", 0),
            category("b", "Bravo", "", 1),
        ]);
        let mv = CategoryMove {
            source: id("b"),
            target: id("a"),
        };
        let changed = repo
            .reorder_categories(&mv, &CategoryListQuery::new().search("alpha"))
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn mutations_publish_snapshots() {
        let repo = MemoryRepository::new(vec![category("a", "Alpha", "", 0)]);
        let mut rx = repo.subscribe();
        assert!(!rx.has_changed().unwrap());

        repo.create_category(&new_category("Garden")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);

        repo.delete_category(&id("missing")).unwrap();
        assert!(!rx.has_changed().unwrap());
    }
}
