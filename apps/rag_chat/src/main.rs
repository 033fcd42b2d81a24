use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{ChatSession, SubmitOutcome, UploadOutcome};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod picker;
mod render;
mod repl;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "rag-chat", about = "Ask questions about your documents")]
struct Args {
    /// Settings file; defaults to ./rag_chat.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    /// Per-request timeout; 0 disables it.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Language hint forwarded with every question.
    #[arg(long)]
    lang: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask a single question and exit.
    Ask { query: String },
    /// Upload files or directories as one batch and exit.
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(v) = args.server_url {
        settings.server_url = v;
    }
    if let Some(v) = args.timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = args.lang {
        settings.user_lang = Some(v);
    }
    let session = open_session(&settings)?;
    let transcript_view = render::spawn_transcript_renderer(session.transcript().subscribe());
    let notification_view = render::spawn_notification_renderer(session.subscribe_notifications());

    let result = match args.command {
        None => repl::run(&session).await.map(|()| ExitCode::SUCCESS),
        Some(Command::Ask { query }) => Ok(match session.chat().submit(&query).await {
            SubmitOutcome::Answered => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }),
        Some(Command::Upload { paths }) => upload_paths(&session, &paths).await.map(|outcome| {
            match outcome {
                UploadOutcome::Uploaded { .. } => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            }
        }),
    };

    // Closing the session lets both views drain what was published and stop.
    drop(session);
    let _ = transcript_view.await;
    let _ = notification_view.await;
    result
}

fn open_session(settings: &Settings) -> Result<ChatSession> {
    match settings.backend_config() {
        Some(config) => {
            info!(server_url = %config.server_url, "starting session");
            Ok(ChatSession::connect(config, settings.user_lang.clone())?)
        }
        None => {
            warn!("no server url configured; requests will fail until one is set");
            Ok(ChatSession::disconnected())
        }
    }
}

pub(crate) async fn upload_paths(session: &ChatSession, paths: &[PathBuf]) -> Result<UploadOutcome> {
    let selection = picker::select_documents(paths);
    for skipped in &selection.skipped {
        println!("[skip] {} not found or unreadable", skipped.display());
    }
    let files = picker::read_selection(&selection.files).await?;
    let outcome = session.uploads().upload(files).await;
    match &outcome {
        UploadOutcome::Ignored => println!("no documents selected"),
        UploadOutcome::Busy => println!("still waiting for the previous upload"),
        UploadOutcome::Uploaded { .. } | UploadOutcome::Failed(_) => {}
    }
    Ok(outcome)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
