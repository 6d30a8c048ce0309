//! History change notifications
//!
//! A typed broadcast channel the presentation layer subscribes to
//! (via the SSE endpoint), replacing the ambient cross-component event
//! bus the page scripts used. At most one message is emitted per
//! successful save.

use serde::Serialize;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Emitted once per successfully recorded generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryChanged {
    pub user_id: String,
    pub entry_id: String,
}

/// Broadcast fan-out for history changes
#[derive(Clone)]
pub struct HistoryNotifier {
    tx: broadcast::Sender<HistoryChanged>,
}

impl HistoryNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Emit a change; having no subscribers is not an error
    pub fn notify(&self, message: HistoryChanged) {
        let receivers = self.tx.send(message).unwrap_or(0);
        tracing::debug!(receivers, "History change notified");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HistoryChanged> {
        self.tx.subscribe()
    }
}

impl Default for HistoryNotifier {
    #[mutants::skip] // Delegates to new(); channel capacity has no observable mutant
    fn default() -> Self {
        Self::new()
    }
}
