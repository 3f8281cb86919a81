//! Filtered, ordered view over the category collection.

use crate::domain::category::Category;

/// Case-insensitive substring match against name or description.
///
/// An empty query matches every category.
pub fn matches(category: &Category, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    category.name.to_lowercase().contains(&query)
        || category.description.to_lowercase().contains(&query)
}

/// Returns the categories matching `query`, ascending by `sort_order`.
///
/// The sort is stable, so equal `sort_order` values keep collection order.
pub fn project<'a, I>(categories: I, query: &str) -> Vec<Category>
where
    I: IntoIterator<Item = &'a Category>,
{
    let mut visible: Vec<Category> = categories
        .into_iter()
        .filter(|c| matches(c, query))
        .cloned()
        .collect();
    visible.sort_by_key(|c| c.sort_order);
    visible
}
