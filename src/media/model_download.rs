// SPDX-License-Identifier: MPL-2.0
//! Fetching and verifying model artifacts.
//!
//! This module provides functionality for:
//! - Downloading a model file from a URL with progress reporting
//! - Verifying model integrity with BLAKE3 checksum

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Errors that can occur while fetching or verifying a model.
#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// The request failed or the server answered with an error.
    #[error("download failed: {0}")]
    Http(String),
    /// The server sent no data.
    #[error("downloaded file is empty")]
    Empty,
    /// Model file not found at expected path.
    #[error("model file not found")]
    ModelNotFound,
    /// Model checksum verification failed.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    /// Writing or moving the downloaded file failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// A download in progress, written next to its destination.
///
/// The partial file is hashed as it is written and removed on drop unless
/// [`PartialDownload::commit`] moved it into place, so an interrupted or
/// rejected download never touches an existing file at the destination.
struct PartialDownload {
    path: PathBuf,
    file: Option<BufWriter<File>>,
    hasher: blake3::Hasher,
    written: u64,
}

impl PartialDownload {
    fn create(dest: &Path) -> DownloadResult<Self> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| DownloadError::Io(e.to_string()))?;
        }
        let path = partial_path(dest);
        let file = File::create(&path).map_err(|e| DownloadError::Io(e.to_string()))?;
        Ok(Self {
            path,
            file: Some(BufWriter::new(file)),
            hasher: blake3::Hasher::new(),
            written: 0,
        })
    }

    fn write(&mut self, chunk: &[u8]) -> DownloadResult<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| DownloadError::Io("download already closed".to_string()))?;
        file.write_all(chunk)
            .map_err(|e| DownloadError::Io(e.to_string()))?;
        self.hasher.update(chunk);
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flushes, checks size and checksum, then renames over `dest`.
    fn commit(mut self, dest: &Path, expected_hash: Option<&str>) -> DownloadResult<u64> {
        if let Some(writer) = self.file.take() {
            let file = writer
                .into_inner()
                .map_err(|e| DownloadError::Io(e.error().to_string()))?;
            file.sync_all()
                .map_err(|e| DownloadError::Io(e.to_string()))?;
        }

        if self.written == 0 {
            return Err(DownloadError::Empty);
        }

        if let Some(expected) = expected_hash {
            let actual = self.hasher.finalize().to_hex().to_string();
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(DownloadError::ChecksumMismatch {
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        fs::rename(&self.path, dest).map_err(|e| DownloadError::Io(e.to_string()))?;
        Ok(self.written)
    }
}

impl Drop for PartialDownload {
    fn drop(&mut self) {
        self.file.take();
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Sibling path a download of `dest` is streamed into.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

fn http_client() -> DownloadResult<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(concat!("formcheck/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| DownloadError::Http(e.to_string()))
}

async fn get(url: &str) -> DownloadResult<reqwest::Response> {
    let response = http_client()?
        .get(url)
        .send()
        .await
        .map_err(|e| DownloadError::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(DownloadError::Http(format!(
            "HTTP status: {}",
            response.status()
        )));
    }
    Ok(response)
}

/// Downloads the model at `url` to `dest`.
///
/// The body is streamed into `<dest>.part` and only renamed over `dest` once
/// it is non-empty and, when `expected_hash` is given, matches that BLAKE3
/// digest. On any failure the partial file is removed and an existing file
/// at `dest` is left as it was.
///
/// `progress_callback` receives values in `[0, 1]` when the server announces
/// a content length. Returns the number of bytes written.
pub async fn download_model(
    url: &str,
    dest: &Path,
    expected_hash: Option<&str>,
    mut progress_callback: impl FnMut(f32) + Send,
) -> DownloadResult<u64> {
    use futures_util::StreamExt;

    let response = get(url).await?;
    let total_size = response.content_length().unwrap_or(0);

    let mut partial = PartialDownload::create(dest)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::Http(e.to_string()))?;
        partial.write(&chunk)?;

        if total_size > 0 {
            #[allow(clippy::cast_precision_loss)]
            let progress = partial.written as f32 / total_size as f32;
            progress_callback(progress.min(1.0));
        }
    }

    partial.commit(dest, expected_hash)
}

/// Downloads a small text document, such as a model manifest, into memory.
///
/// # Errors
///
/// Returns [`DownloadError::Http`] on request failure and
/// [`DownloadError::Empty`] for an empty body.
pub async fn download_text(url: &str) -> DownloadResult<String> {
    let text = get(url)
        .await?
        .text()
        .await
        .map_err(|e| DownloadError::Http(e.to_string()))?;
    if text.is_empty() {
        return Err(DownloadError::Empty);
    }
    Ok(text)
}

/// Writes `text` to `dest` through the same partial-file-then-rename path as
/// [`download_model`], so a reader never sees a half-written file.
///
/// # Errors
///
/// Returns [`DownloadError::Empty`] for empty text and
/// [`DownloadError::Io`] if the file cannot be written or moved.
pub fn save_text(dest: &Path, text: &str) -> DownloadResult<()> {
    let mut partial = PartialDownload::create(dest)?;
    partial.write(text.as_bytes())?;
    partial.commit(dest, None).map(|_| ())
}

/// Computes the BLAKE3 hex digest of the file at `path`.
pub fn compute_hash(path: &Path) -> DownloadResult<String> {
    if !path.exists() {
        return Err(DownloadError::ModelNotFound);
    }
    let file_data = fs::read(path).map_err(|e| DownloadError::Io(e.to_string()))?;
    Ok(blake3::hash(&file_data).to_hex().to_string())
}

/// Verifies the file at `path` against `expected_hash` (case-insensitive hex).
pub fn verify_checksum(path: &Path, expected_hash: &str) -> DownloadResult<()> {
    let actual_hash = compute_hash(path)?;
    if !actual_hash.eq_ignore_ascii_case(expected_hash) {
        return Err(DownloadError::ChecksumMismatch {
            expected: expected_hash.to_string(),
            actual: actual_hash,
        });
    }
    Ok(())
}
