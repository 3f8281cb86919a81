//! Drag-and-drop reordering over the currently visible list.
//!
//! A move is expressed against whatever the user sees, which may be a filtered
//! subset of the collection. Only the visible categories are renumbered;
//! hidden ones keep their `sort_order`. Under a filter this can leave the
//! global order non-contiguous, which callers surface as a warning.

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{CategoryId, SortOrder};

/// "Move `source` to where `target` is."
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryMove {
    pub source: CategoryId,
    pub target: CategoryId,
}

/// New `sort_order` values for the visible categories, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderPlan {
    pub assignments: Vec<(CategoryId, SortOrder)>,
}

impl ReorderPlan {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Overwrites `sort_order` of every planned category in `categories`.
    ///
    /// Categories absent from the plan are left untouched, as is `updated_at`.
    /// Returns the number of records changed.
    pub fn apply_to(&self, categories: &mut [Category]) -> usize {
        let mut changed = 0;
        for category in categories.iter_mut() {
            if let Some((_, order)) = self.assignments.iter().find(|(id, _)| *id == category.id) {
                category.sort_order = *order;
                changed += 1;
            }
        }
        changed
    }
}

/// Computes the renumbering produced by moving `mv.source` onto `mv.target`
/// within `visible`.
///
/// Returns `None` when either id is not visible or both are the same item.
pub fn plan(visible: &[Category], mv: &CategoryMove) -> Option<ReorderPlan> {
    if mv.source == mv.target {
        return None;
    }
    let from = visible.iter().position(|c| c.id == mv.source)?;
    let to = visible.iter().position(|c| c.id == mv.target)?;

    let mut ids: Vec<&CategoryId> = visible.iter().map(|c| &c.id).collect();
    let moved = ids.remove(from);
    ids.insert(to, moved);

    let assignments = ids
        .into_iter()
        .enumerate()
        .map(|(index, id)| (id.clone(), SortOrder::from_index(index)))
        .collect();
    Some(ReorderPlan { assignments })
}
