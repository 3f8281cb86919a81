use tokio::sync::mpsc;

use crate::domain::notice::{Notice, NoticeLevel};

/// Receives the notices emitted by board actions.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => log::error!("{notice}"),
            NoticeLevel::Success | NoticeLevel::Info => log::info!("{notice}"),
        }
    }
}

/// Forwards notices over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Notice>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.sender.send(notice) {
            log::debug!("Dropping notice, receiver is gone: {}", e.0);
        }
    }
}
