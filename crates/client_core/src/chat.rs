use std::sync::Arc;

use shared::{domain::ChatTurn, protocol::ChatRequest};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    error::BackendError, pending::PendingFlag, transcript::TranscriptState, transport::RagBackend,
};

/// Which path a [`ChatCoordinator::submit`] call took.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank query; nothing was sent or recorded.
    Ignored,
    /// Another submission is still in flight.
    Busy,
    Answered,
    /// The request failed and an error turn was recorded instead.
    Failed(BackendError),
}

pub struct ChatCoordinator {
    backend: Arc<dyn RagBackend>,
    transcript: Arc<TranscriptState>,
    user_lang: Option<String>,
    sending: PendingFlag,
    draft: Arc<watch::Sender<String>>,
}

impl ChatCoordinator {
    pub fn new(
        backend: Arc<dyn RagBackend>,
        transcript: Arc<TranscriptState>,
        user_lang: Option<String>,
    ) -> Self {
        let (draft, _rx) = watch::channel(String::new());
        Self {
            backend,
            transcript,
            user_lang,
            sending: PendingFlag::default(),
            draft: Arc::new(draft),
        }
    }

    pub fn is_sending(&self) -> bool {
        self.sending.is_set()
    }

    pub fn draft(&self) -> String {
        self.draft.borrow().clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.draft.send_replace(text.into());
    }

    /// Submits whatever is currently in the input buffer.
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let query = self.draft();
        self.submit(&query).await
    }

    /// Records the user turn immediately, then the answer or an error turn
    /// once the backend replies. Never fails; the outcome says what happened.
    ///
    /// The request runs on its own task, so dropping the returned future does
    /// not cancel it: the resolution turn is still published and the pending
    /// flag is released only after that.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        if query.trim().is_empty() {
            debug!("chat: ignoring blank query");
            return SubmitOutcome::Ignored;
        }
        let Some(sending) = self.sending.try_claim() else {
            debug!("chat: submission already in flight");
            return SubmitOutcome::Busy;
        };

        let mut optimistic = self.transcript.snapshot().as_ref().clone();
        optimistic.push(ChatTurn::user(query));
        self.transcript.publish(optimistic.clone());

        info!(turns = optimistic.len(), "chat: sending query");
        let request = ChatRequest::new(query).with_user_lang(self.user_lang.clone());
        let backend = self.backend.clone();
        let transcript = self.transcript.clone();
        let draft = self.draft.clone();
        let task = tokio::spawn(async move {
            let _sending = sending;
            let (turn, outcome) = match backend.chat(request).await {
                Ok(response) => {
                    info!(
                        answer_len = response.text.len(),
                        tables = response.tables.len(),
                        images = response.images.len(),
                        "chat: answer received"
                    );
                    (ChatTurn::assistant(response.text), SubmitOutcome::Answered)
                }
                Err(err) => {
                    warn!(error = %err, "chat: request failed");
                    (
                        ChatTurn::assistant(error_turn_text(&err)),
                        SubmitOutcome::Failed(err),
                    )
                }
            };

            let answered = matches!(outcome, SubmitOutcome::Answered);
            let mut resolved = optimistic;
            resolved.push(turn);
            transcript.publish(resolved);
            if answered {
                draft.send_replace(String::new());
            }
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "chat: request task aborted");
                SubmitOutcome::Failed(BackendError::Unavailable(format!(
                    "chat request task aborted: {err}"
                )))
            }
        }
    }
}

pub fn error_turn_text(err: &BackendError) -> String {
    format!("Error: {}", err.user_message())
}

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod tests;
