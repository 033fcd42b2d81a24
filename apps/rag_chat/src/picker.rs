//! Terminal stand-in for the browser file picker.
//!
//! Directories expand to the document kinds the backend indexes; files named
//! explicitly are taken as-is, like a picker with "All files" selected.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::UploadFile;
use shared::domain::DocumentKind;
use tracing::warn;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

pub fn select_documents(paths: &[PathBuf]) -> Selection {
    let mut selection = Selection::default();
    for path in paths {
        if path.is_file() {
            selection.files.push(path.clone());
        } else if path.is_dir() {
            match accepted_in_dir(path) {
                Ok(files) => selection.files.extend(files),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cannot list directory");
                    selection.skipped.push(path.clone());
                }
            }
        } else {
            selection.skipped.push(path.clone());
        }
    }
    selection
}

fn accepted_in_dir(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && DocumentKind::from_path(path).is_some())
        .collect();
    files.sort();
    Ok(files)
}

pub async fn read_selection(files: &[PathBuf]) -> anyhow::Result<Vec<UploadFile>> {
    let mut uploads = Vec::with_capacity(files.len());
    for path in files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut upload = UploadFile::new(name, bytes);
        if let Some(mime) = mime_guess::from_path(path).first() {
            upload = upload.with_mime_type(mime.essence_str());
        }
        uploads.push(upload);
    }
    Ok(uploads)
}

#[cfg(test)]
#[path = "tests/picker_tests.rs"]
mod tests;
