use std::path::PathBuf;

use client_core::{ChatSession, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{render::format_uploaded_files, upload_paths};

pub const HELP: &str = "\
Type a question and press enter to ask it.
  /upload <path>...  upload files, or every PDF/DOCX/TXT/MD file in a directory
  /files             list uploaded files
  /retry             resend the last unanswered question
  /help              show this help
  /quit              exit";

#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Upload(Vec<PathBuf>),
    Files,
    Retry,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let Some(command) = line.trim_start().strip_prefix('/') else {
        return ReplCommand::Ask(line.to_string());
    };
    let mut words = command.split_whitespace();
    match words.next().unwrap_or_default() {
        "upload" => ReplCommand::Upload(words.map(PathBuf::from).collect()),
        "files" => ReplCommand::Files,
        "retry" => ReplCommand::Retry,
        "help" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

pub async fn run(session: &ChatSession) -> anyhow::Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            ReplCommand::Ask(query) => ask(session, query).await,
            ReplCommand::Retry => submit_draft(session).await,
            ReplCommand::Upload(paths) => {
                if paths.is_empty() {
                    println!("usage: /upload <path>...");
                    continue;
                }
                if let Err(err) = upload_paths(session, &paths).await {
                    println!("[error] {err:#}");
                }
            }
            ReplCommand::Files => {
                println!("{}", format_uploaded_files(&session.uploaded_files().snapshot()));
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(name) => println!("unknown command '/{name}', try /help"),
        }
    }
    Ok(())
}

/// Blank lines leave the draft alone so `/retry` still has something to resend.
async fn ask(session: &ChatSession, query: String) {
    if query.trim().is_empty() {
        return;
    }
    session.chat().set_draft(query);
    submit_draft(session).await;
}

async fn submit_draft(session: &ChatSession) {
    if let SubmitOutcome::Busy = session.chat().submit_draft().await {
        println!("still waiting for the previous answer");
    }
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;
