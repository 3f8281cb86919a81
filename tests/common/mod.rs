//! Helpers for integration tests.

use std::sync::Arc;

use category_board::actions::{ActionDelays, CategoryBoard, ChannelSink};
use category_board::domain::notice::Notice;
use category_board::domain::seed::demo_categories;
use category_board::repository::MemoryRepository;
use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Board over the demo categories with notices captured on a channel.
pub struct TestBoard {
    pub board: CategoryBoard<MemoryRepository>,
    notices: UnboundedReceiver<Notice>,
}

impl TestBoard {
    pub fn new() -> Self {
        let categories =
            demo_categories(Utc::now().naive_utc()).expect("demo categories are valid");
        Self::with_repository(MemoryRepository::new(categories))
    }

    pub fn with_repository(repo: MemoryRepository) -> Self {
        let (sink, notices) = ChannelSink::new();
        let board = CategoryBoard::new(Arc::new(repo), Arc::new(sink), ActionDelays::default());
        TestBoard { board, notices }
    }

    /// Notices emitted since the previous call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::iter::from_fn(|| self.notices.try_recv().ok()).collect()
    }

    /// Names of the unfiltered list in display order.
    pub fn names(&self) -> Vec<String> {
        self.board
            .list("")
            .expect("listing categories")
            .into_iter()
            .map(|row| row.name)
            .collect()
    }
}
