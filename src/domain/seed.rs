//! Demo records loaded into a fresh board.

use chrono::NaiveDateTime;

use crate::domain::category::Category;
use crate::domain::types::{
    CategoryId, CategoryName, HexColor, IconName, SortOrder, TypeConstraintError,
};

struct SeedRow {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    color: &'static str,
    is_active: bool,
    parent_id: Option<&'static str>,
    sort_order: i32,
    icon: &'static str,
}

const DEMO_ROWS: &[SeedRow] = &[
    SeedRow {
        id: "1",
        name: "Electronics",
        description: "Gadgets and devices",
        color: "#3B82F6",
        is_active: true,
        parent_id: None,
        sort_order: 0,
        icon: "Smartphone",
    },
    SeedRow {
        id: "2",
        name: "Books",
        description: "Printed and digital books",
        color: "#10B981",
        is_active: true,
        parent_id: None,
        sort_order: 1,
        icon: "BookOpen",
    },
    SeedRow {
        id: "3",
        name: "Clothing",
        description: "Apparel and accessories",
        color: "#8B5CF6",
        is_active: false,
        parent_id: None,
        sort_order: 2,
        icon: "Shirt",
    },
    SeedRow {
        id: "4",
        name: "Mobile Phones",
        description: "Latest mobile phones",
        color: "#2563EB",
        is_active: true,
        parent_id: Some("1"),
        sort_order: 0,
        icon: "Smartphone",
    },
];

/// Builds the demo categories, all stamped with `now`.
///
/// "Mobile Phones" shares `sort_order` 0 with "Electronics"; ties resolve by
/// position, so it is listed right after its parent.
pub fn demo_categories(now: NaiveDateTime) -> Result<Vec<Category>, TypeConstraintError> {
    DEMO_ROWS
        .iter()
        .map(|row| {
            Ok(Category {
                id: CategoryId::new(row.id)?,
                name: CategoryName::new(row.name)?,
                description: row.description.to_string(),
                color: HexColor::new(row.color)?,
                icon: IconName::new(row.icon)?,
                is_active: row.is_active,
                parent_id: row.parent_id.map(CategoryId::new).transpose()?,
                sort_order: SortOrder::new(row.sort_order)?,
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}
