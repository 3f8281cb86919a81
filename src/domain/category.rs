use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, HexColor, IconName, SortOrder};

/// Canonical category record held by the store.
///
/// `parent_id` is a weak reference: it is only ever resolved by id lookup and
/// may point at a record that no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: String,
    pub color: HexColor,
    pub icon: IconName,
    pub is_active: bool,
    pub parent_id: Option<CategoryId>,
    pub sort_order: SortOrder,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    /// Whether `self` is a direct child of `parent`.
    pub fn is_child_of(&self, parent: &CategoryId) -> bool {
        self.parent_id.as_ref() == Some(parent)
    }

    /// Overwrites every mutable field with `changes` and stamps `updated_at`.
    pub fn apply(&mut self, changes: CategoryChanges, now: NaiveDateTime) {
        self.name = changes.name;
        self.description = changes.description;
        self.color = changes.color;
        self.icon = changes.icon;
        self.is_active = changes.is_active;
        self.parent_id = changes.parent_id;
        self.sort_order = changes.sort_order;
        self.updated_at = now;
    }
}

/// Data required to insert a new [`Category`].
///
/// The store assigns the id, the timestamps and the `sort_order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub description: String,
    pub color: HexColor,
    pub icon: IconName,
    pub is_active: bool,
    pub parent_id: Option<CategoryId>,
}

impl NewCategory {
    pub fn into_category(
        self,
        id: CategoryId,
        sort_order: SortOrder,
        now: NaiveDateTime,
    ) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
            color: self.color,
            icon: self.icon,
            is_active: self.is_active,
            parent_id: self.parent_id,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Full replacement of the mutable fields of an existing [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryChanges {
    pub name: CategoryName,
    pub description: String,
    pub color: HexColor,
    pub icon: IconName,
    pub is_active: bool,
    pub parent_id: Option<CategoryId>,
    pub sort_order: SortOrder,
}
