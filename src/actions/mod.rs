//! Asynchronous boundary between a presentation layer and the services.
//!
//! Each action validates its form, marks itself in flight, waits out a
//! simulated round-trip inside a spawned task, applies the mutation and emits
//! a [`Notice`]. The spawned task is never cancelled: dropping the future
//! returned by an action does not stop the mutation, and the in-flight flag
//! is always cleared.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::category::Category;
use crate::domain::notice::Notice;
use crate::domain::types::CategoryId;
use crate::dto::categories::{CategoryDto, DeleteCategoryPreviewDto, ParentOptionDto};
use crate::forms::categories::{
    CategoryForm, CategoryFormError, CategoryFormPayload, DeleteCategoryForm,
    DeleteCategoryFormPayload, FieldErrors, ReorderCategoryForm, ReorderCategoryFormPayload,
    ToggleCategoryForm, ToggleCategoryFormPayload,
};
use crate::models::config::AppConfig;
use crate::repository::{CategoryListQuery, CategoryReader, CategoryWriter};
use crate::services::categories as service;
use crate::services::{ServiceError, ServiceResult};

pub mod in_flight;
pub mod notify;

pub use in_flight::{InFlight, InFlightKey};
pub use notify::{ChannelSink, LogSink, NotificationSink};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The submitted form failed validation; nothing was sent to the store.
    #[error("validation failed")]
    Validation(FieldErrors),
    /// The same action is already in flight for this entity.
    #[error("action already in progress")]
    Busy,
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The background task panicked before finishing.
    #[error("action interrupted")]
    Interrupted,
}

impl From<CategoryFormError> for ActionError {
    fn from(value: CategoryFormError) -> Self {
        match value {
            CategoryFormError::Validation(errors) => Self::Validation(errors),
        }
    }
}

/// Simulated round-trip per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDelays {
    pub save: Duration,
    pub delete: Duration,
    pub toggle: Duration,
}

impl Default for ActionDelays {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ActionDelays {
    fn from(config: &AppConfig) -> Self {
        Self {
            save: Duration::from_millis(config.save_delay_ms),
            delete: Duration::from_millis(config.delete_delay_ms),
            toggle: Duration::from_millis(config.toggle_delay_ms),
        }
    }
}

/// Handle used by a presentation layer to read and mutate the categories.
///
/// Cheap to clone; clones share the repository, the in-flight set and the
/// notification sink.
pub struct CategoryBoard<R> {
    repo: Arc<R>,
    sink: Arc<dyn NotificationSink>,
    in_flight: InFlight,
    delays: ActionDelays,
}

impl<R> Clone for CategoryBoard<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            sink: Arc::clone(&self.sink),
            in_flight: self.in_flight.clone(),
            delays: self.delays,
        }
    }
}

impl<R> CategoryBoard<R>
where
    R: CategoryReader + CategoryWriter + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, sink: Arc<dyn NotificationSink>, delays: ActionDelays) -> Self {
        Self {
            repo,
            sink,
            in_flight: InFlight::default(),
            delays,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Whether the control for `key` should be disabled.
    pub fn is_busy(&self, key: &InFlightKey) -> bool {
        self.in_flight.contains(key)
    }

    /// Rows for the grid filtered by `search`.
    pub fn list(&self, search: &str) -> ServiceResult<Vec<CategoryDto>> {
        service::show_categories(CategoryListQuery::new().search(search), self.repo.as_ref())
    }

    pub fn parent_options(
        &self,
        editing: Option<&CategoryId>,
    ) -> ServiceResult<Vec<ParentOptionDto>> {
        service::show_parent_options(editing, self.repo.as_ref())
    }

    pub fn delete_preview(
        &self,
        category_id: &CategoryId,
    ) -> ServiceResult<DeleteCategoryPreviewDto> {
        service::show_delete_preview(category_id, self.repo.as_ref())
    }

    /// Saves the create/edit form. Creates when `form.id` is empty.
    pub async fn submit(&self, form: CategoryForm) -> Result<Category, ActionError> {
        let payload = CategoryFormPayload::try_from(form)?;
        let is_update = matches!(payload, CategoryFormPayload::Update { .. });
        let name = payload.name().to_string();

        self.run(InFlightKey::Save, self.delays.save, move |repo, sink| {
            let result = service::save_category(payload, repo);
            match &result {
                Ok(_) if is_update => {
                    sink.notify(Notice::success(format!("Category \"{name}\" updated.")))
                }
                Ok(_) => sink.notify(Notice::success(format!("Category \"{name}\" created."))),
                Err(e) => {
                    log::debug!("Save rejected: {e}");
                    sink.notify(Notice::error("Failed to save category."))
                }
            }
            result
        })
        .await
    }

    /// Deletes a category and its direct children. Returns the number of
    /// records removed; zero when the category was already gone.
    pub async fn delete(&self, form: DeleteCategoryForm) -> Result<usize, ActionError> {
        let payload = DeleteCategoryFormPayload::try_from(form)?;
        let key = InFlightKey::Delete(payload.category_id.clone());

        self.run(key, self.delays.delete, move |repo, sink| {
            let name = match repo.get_category_by_id(&payload.category_id) {
                Ok(category) => category.map(|c| c.name.into_inner()),
                Err(e) => {
                    log::error!("Failed to get category before delete: {e}");
                    None
                }
            };
            let result = service::delete_category(payload, repo);
            match (&result, name) {
                (Ok(0), _) => log::debug!("Delete resolved to no change"),
                (Ok(_), Some(name)) => {
                    sink.notify(Notice::success(format!("Category \"{name}\" deleted.")))
                }
                (Ok(_), None) => sink.notify(Notice::success("Category deleted.")),
                (Err(_), _) => sink.notify(Notice::error("Failed to delete category.")),
            }
            result
        })
        .await
    }

    /// Sets the active flag of a category.
    pub async fn toggle_status(&self, form: ToggleCategoryForm) -> Result<Category, ActionError> {
        let payload = ToggleCategoryFormPayload::try_from(form)?;
        let key = InFlightKey::Toggle(payload.category_id.clone());
        let state = if payload.is_active {
            "active"
        } else {
            "inactive"
        };

        self.run(key, self.delays.toggle, move |repo, sink| {
            let result = service::set_category_active(payload, repo);
            match &result {
                Ok(_) => sink.notify(Notice::info(
                    "Status Updated",
                    format!("Category status changed to {state}."),
                )),
                Err(_) => sink.notify(Notice::error("Failed to update status.")),
            }
            result
        })
        .await
    }

    /// Applies a drag-and-drop gesture immediately.
    ///
    /// Under an active search the move still happens, but only the visible
    /// categories are renumbered, so an info notice is emitted first. That
    /// notice is sent before the move is resolved: if the source or target is
    /// hidden by the search, the gesture is a no-op and no success follows.
    pub fn reorder(&self, form: ReorderCategoryForm) -> Result<usize, ActionError> {
        let payload = ReorderCategoryFormPayload::try_from(form)?;
        let filtered = payload.is_filtered();
        let moves = payload.category_move.source != payload.category_move.target;

        if filtered && moves {
            self.sink.notify(Notice::info(
                "Reordering Best Without Filters",
                "For consistent global ordering, please clear search filters before reordering categories.",
            ));
        }

        match service::reorder_categories(payload, self.repo.as_ref()) {
            Ok(0) => Ok(0),
            Ok(changed) => {
                self.sink.notify(Notice::success("Category order updated."));
                Ok(changed)
            }
            Err(e) => {
                self.sink.notify(Notice::error("Failed to reorder categories."));
                Err(e.into())
            }
        }
    }

    /// Runs `work` after `delay` in a spawned task while `key` is in flight.
    async fn run<T, F>(
        &self,
        key: InFlightKey,
        delay: Duration,
        work: F,
    ) -> Result<T, ActionError>
    where
        T: Send + 'static,
        F: FnOnce(&R, &dyn NotificationSink) -> ServiceResult<T> + Send + 'static,
    {
        let guard = self.in_flight.acquire(key).ok_or(ActionError::Busy)?;
        let repo = Arc::clone(&self.repo);
        let sink = Arc::clone(&self.sink);

        let task = tokio::spawn(async move {
            let _guard = guard;
            tokio::time::sleep(delay).await;
            work(repo.as_ref(), sink.as_ref())
        });

        match task.await {
            Ok(result) => result.map_err(ActionError::from),
            Err(e) => {
                log::error!("Category action task failed: {e}");
                Err(ActionError::Interrupted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notice::NoticeLevel;
    use crate::domain::seed::demo_categories;
    use crate::repository::test::TestRepository;
    use chrono::Utc;
    use tokio::sync::mpsc::UnboundedReceiver;

    type Harness = (CategoryBoard<TestRepository>, UnboundedReceiver<Notice>);

    fn board_with(repo: TestRepository) -> Harness {
        let (sink, notices) = ChannelSink::new();
        let board = CategoryBoard::new(Arc::new(repo), Arc::new(sink), ActionDelays::default());
        (board, notices)
    }

    fn demo_board() -> Harness {
        board_with(TestRepository::new(
            demo_categories(Utc::now().naive_utc()).unwrap(),
        ))
    }

    fn id(value: &str) -> CategoryId {
        CategoryId::new(value).unwrap()
    }

    fn toggle(category_id: &str, is_active: bool) -> ToggleCategoryForm {
        ToggleCategoryForm {
            category_id: category_id.to_string(),
            is_active,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn submit_creates_and_announces() {
        let (board, mut notices) = demo_board();
        let form = CategoryForm {
            name: "Garden".to_string(),
            ..CategoryForm::default()
        };

        let created = board.submit(form).await.unwrap();
        assert_eq!(created.sort_order, 3);
        assert!(!board.is_busy(&InFlightKey::Save));

        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.description, "Category \"Garden\" created.");
    }

    #[tokio::test(start_paused = true)]
    async fn submit_update_announces_update() {
        let (board, mut notices) = demo_board();
        let existing = board.repository().get_category_by_id(&id("2")).unwrap().unwrap();
        let mut form = CategoryForm::from_category(&existing);
        form.name = "Novels".to_string();

        board.submit(form).await.unwrap();
        assert_eq!(
            notices.try_recv().unwrap().description,
            "Category \"Novels\" updated."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_form_never_reaches_the_store() {
        let (board, mut notices) = demo_board();
        let form = CategoryForm {
            name: "A".to_string(),
            color: "blue".to_string(),
            ..CategoryForm::default()
        };

        let err = board.submit(form).await.unwrap_err();
        let ActionError::Validation(fields) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("color"));
        assert_eq!(board.repository().all_categories().unwrap().len(), 4);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn store_failure_emits_error_and_leaves_store_unchanged() {
        let (board, mut notices) = board_with(
            TestRepository::new(demo_categories(Utc::now().naive_utc()).unwrap())
                .failing_writes(),
        );

        let err = board.toggle_status(toggle("3", true)).await.unwrap_err();
        assert_eq!(err, ActionError::Service(ServiceError::Internal));
        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.description, "Failed to update status.");

        let clothing = board.repository().get_category_by_id(&id("3")).unwrap().unwrap();
        assert!(!clothing.is_active);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_toggle_of_same_category_is_rejected() {
        let (board, mut notices) = demo_board();
        let key = InFlightKey::Toggle(id("2"));

        let first = tokio::spawn({
            let board = board.clone();
            async move { board.toggle_status(toggle("2", false)).await }
        });
        while !board.is_busy(&key) {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            board.toggle_status(toggle("2", true)).await.unwrap_err(),
            ActionError::Busy
        );
        // Other categories are not blocked.
        assert!(board.toggle_status(toggle("1", false)).await.is_ok());

        let toggled = first.await.unwrap().unwrap();
        assert!(!toggled.is_active);
        assert!(!board.is_busy(&key));

        let descriptions: Vec<_> = std::iter::from_fn(|| notices.try_recv().ok())
            .map(|n| n.description)
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "Category status changed to inactive.".to_string(),
                "Category status changed to inactive.".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_action_still_completes() {
        let (board, mut notices) = demo_board();

        let attempt = tokio::time::timeout(
            Duration::from_millis(1),
            board.toggle_status(toggle("3", true)),
        )
        .await;
        assert!(attempt.is_err());
        assert!(board.is_busy(&InFlightKey::Toggle(id("3"))));

        tokio::time::sleep(Duration::from_secs(1)).await;
        let clothing = board.repository().get_category_by_id(&id("3")).unwrap().unwrap();
        assert!(clothing.is_active);
        assert!(!board.is_busy(&InFlightKey::Toggle(id("3"))));
        assert_eq!(notices.try_recv().unwrap().title, "Status Updated");
    }

    #[tokio::test(start_paused = true)]
    async fn delete_cascades_and_announces() {
        let (board, mut notices) = demo_board();
        let preview = board.delete_preview(&id("1")).unwrap();
        assert!(preview.has_subcategories());

        let removed = board
            .delete(DeleteCategoryForm {
                category_id: "1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(
            notices.try_recv().unwrap().description,
            "Category \"Electronics\" deleted."
        );

        let again = board
            .delete(DeleteCategoryForm {
                category_id: "1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(again, 0);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn filtered_reorder_warns_then_confirms() {
        let (board, mut notices) = demo_board();
        let changed = board
            .reorder(ReorderCategoryForm {
                source_id: "3".to_string(),
                target_id: "2".to_string(),
                search: "o".to_string(),
            })
            .unwrap();
        assert!(changed > 0);

        let first = notices.try_recv().unwrap();
        assert_eq!(first.level, NoticeLevel::Info);
        assert_eq!(first.title, "Reordering Best Without Filters");
        assert_eq!(
            notices.try_recv().unwrap().description,
            "Category order updated."
        );
    }

    #[tokio::test]
    async fn unfiltered_reorder_moves_item_to_front() {
        let (board, mut notices) = demo_board();
        board
            .reorder(ReorderCategoryForm {
                source_id: "3".to_string(),
                target_id: "1".to_string(),
                search: String::new(),
            })
            .unwrap();

        let rows = board.list("").unwrap();
        let ordered: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.sort_order)).collect();
        assert_eq!(
            ordered,
            vec![
                ("Clothing", 0),
                ("Electronics", 1),
                ("Mobile Phones", 2),
                ("Books", 3)
            ]
        );
        assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Success);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn filtered_reorder_with_hidden_source_only_warns() {
        let (board, mut notices) = demo_board();
        let changed = board
            .reorder(ReorderCategoryForm {
                source_id: "4".to_string(),
                target_id: "2".to_string(),
                search: "books".to_string(),
            })
            .unwrap();
        assert_eq!(changed, 0);

        assert_eq!(
            notices.try_recv().unwrap().title,
            "Reordering Best Without Filters"
        );
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn reorder_onto_itself_is_silent() {
        let (board, mut notices) = demo_board();
        let changed = board
            .reorder(ReorderCategoryForm {
                source_id: "2".to_string(),
                target_id: "2".to_string(),
                search: String::new(),
            })
            .unwrap();
        assert_eq!(changed, 0);
        assert!(notices.try_recv().is_err());
    }
}
