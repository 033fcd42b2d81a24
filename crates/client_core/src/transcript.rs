use std::sync::Arc;

use shared::domain::ChatTurn;
use tokio::sync::watch;

pub type TranscriptSnapshot = Arc<Vec<ChatTurn>>;

/// Ordered, append-only chat log.
///
/// Readers only ever see whole published sequences: writers build the next
/// sequence locally and swap it in with a single [`TranscriptState::publish`].
#[derive(Debug)]
pub struct TranscriptState {
    tx: watch::Sender<TranscriptSnapshot>,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self { tx }
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TranscriptSnapshot> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn publish(&self, next: Vec<ChatTurn>) {
        debug_assert!(
            next.len() >= self.len(),
            "transcript must never shrink"
        );
        self.tx.send_replace(Arc::new(next));
    }
}
