use client_core::{Notification, NotificationLevel, TranscriptSnapshot};
use shared::domain::{ChatTurn, UploadedFileRecord};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};

pub fn format_turn(turn: &ChatTurn) -> String {
    format!("{}: {}", turn.role().label(), turn.content())
}

pub fn format_notification(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Success => format!("[ok] {}", notification.message),
        NotificationLevel::Error => format!("[error] {}", notification.message),
    }
}

pub fn format_uploaded_files(records: &[UploadedFileRecord]) -> String {
    if records.is_empty() {
        return "No files uploaded yet.".to_string();
    }
    let mut out = String::from("Uploaded files:");
    for record in records {
        out.push_str("\n  - ");
        out.push_str(&record.name);
    }
    out
}

/// Tracks how much of the transcript has been shown already.
#[derive(Debug, Default)]
pub struct TranscriptPrinter {
    shown: usize,
}

impl TranscriptPrinter {
    pub fn new_lines(&mut self, turns: &[ChatTurn]) -> Vec<String> {
        let lines = turns.iter().skip(self.shown).map(format_turn).collect();
        self.shown = turns.len();
        lines
    }
}

/// Prints turns as they are published. Ends once the session is dropped and
/// the final transcript has been shown.
pub fn spawn_transcript_renderer(mut rx: watch::Receiver<TranscriptSnapshot>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut printer = TranscriptPrinter::default();
        while rx.changed().await.is_ok() {
            let turns = rx.borrow_and_update().clone();
            for line in printer.new_lines(&turns) {
                println!("{line}");
            }
        }
    })
}

pub fn spawn_notification_renderer(mut rx: broadcast::Receiver<Notification>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(notification) => println!("{}", format_notification(&notification)),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "notification renderer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
