// SPDX-License-Identifier: MPL-2.0
//! Command implementations.
//!
//! Each command writes its report to `out` and is generic over the
//! classifier, so it runs the same against the ONNX adapter and the fake.

use super::history::WorkoutHistory;
use crate::application::detection::Detection;
use crate::application::pipeline::FrameProcessor;
use crate::application::port::PoseClassifier;
use crate::application::workout::WorkoutTracker;
use crate::config::Config;
use crate::domain::exercise::WorkoutSession;
use crate::domain::frame::{Frame, PixelFormat};
use crate::error::{Error, Result};
use crate::infrastructure::onnx::ModelManifest;
use crate::media::model_download;
use chrono::{DateTime, Duration, Utc};
use image_rs::RgbaImage;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Extensions recognized as frames in a workout directory.
pub const FRAME_EXTENSIONS: &[&str] = &["bmp", "jpeg", "jpg", "png", "webp"];

/// Decodes an image file to RGBA pixels.
///
/// # Errors
///
/// Returns [`Error::Image`] if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    Ok(image_rs::open(path)?.to_rgba8())
}

fn as_frame(image: &RgbaImage) -> Frame<'_> {
    Frame::new(image.width(), image.height(), PixelFormat::Rgba8, image.as_raw())
}

/// Lists the frame images in `dir`, sorted by file name.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn frame_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_frame_extension(path))
        .collect();
    files.sort();
    Ok(files)
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Prints the model's input size and labels.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn describe(classifier: &impl PoseClassifier, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "Input: {}x{}",
        classifier.input_width(),
        classifier.input_height()
    )?;
    writeln!(out, "Labels: {}", classifier.labels().join(", "))?;
    Ok(())
}

/// Classifies each image and prints its ranked scores and the detection.
///
/// # Errors
///
/// Stops at the first image that cannot be decoded or classified.
pub fn classify_images<C: PoseClassifier>(
    classifier: &mut C,
    images: &[PathBuf],
    out: &mut impl Write,
) -> Result<()> {
    for path in images {
        let image = load_image(path)?;
        let result = classifier.classify(&as_frame(&image))?;
        let detection = Detection::from_result(&result);

        writeln!(out, "{}", path.display())?;
        for (label, score) in result.ranked() {
            writeln!(out, "  {label:<12} {score:.3}")?;
        }
        writeln!(
            out,
            "  -> {} ({:.0}%)",
            detection.exercise,
            detection.confidence * 100.0
        )?;
    }
    Ok(())
}

/// Runs an ordered frame sequence through the pipeline as one workout.
///
/// Frame `i` is stamped `start + i / fps`. Frames that fail to decode or
/// classify are skipped with a warning. Returns the finished session, or
/// `None` when no rep was counted.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn run_workout<C: PoseClassifier>(
    classifier: C,
    frames: &[PathBuf],
    fps: u32,
    config: &Config,
    start: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<Option<WorkoutSession>> {
    let fps = i64::from(fps.max(1));
    let stamp = |index: usize| {
        let index = i64::try_from(index).unwrap_or(i64::MAX / 1000);
        start + Duration::milliseconds(index.saturating_mul(1000) / fps)
    };

    let mut tracker = WorkoutTracker::new(config.tracker_settings());
    tracker.start(start);
    let mut processor = FrameProcessor::new(classifier, tracker);
    let mut skipped = 0usize;

    for (index, path) in frames.iter().enumerate() {
        let image = match load_image(path) {
            Ok(image) => image,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable frame");
                skipped += 1;
                continue;
            }
        };

        match processor.process(&as_frame(&image), stamp(index)) {
            Ok(report) => {
                if let Some(rep) = report.rep.filter(|_| config.announce_reps) {
                    writeln!(out, "{} rep {}", rep.exercise, rep.total)?;
                }
            }
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        writeln!(out, "Skipped {skipped} of {} frames", frames.len())?;
    }

    let session = processor.tracker_mut().stop(stamp(frames.len()));
    match &session {
        Some(session) => {
            writeln!(
                out,
                "Workout finished in {}: {} reps",
                session.formatted_duration(),
                session.total_reps()
            )?;
            for entry in &session.exercises {
                writeln!(out, "  {}: {}", entry.exercise, entry.count)?;
            }
        }
        None => writeln!(out, "No reps counted, nothing recorded")?,
    }
    Ok(session)
}

/// Prints recorded workouts, most recent first.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show_history(history: &WorkoutHistory, out: &mut impl Write) -> Result<()> {
    if history.is_empty() {
        writeln!(out, "No workouts recorded")?;
        return Ok(());
    }

    for session in history.sessions() {
        let breakdown = session
            .exercises
            .iter()
            .map(|e| format!("{} {}", e.exercise, e.count))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "{}  {:>8}  {} reps ({breakdown})",
            session.date.format("%Y-%m-%d %H:%M"),
            session.formatted_duration(),
            session.total_reps()
        )?;
    }
    Ok(())
}

/// Downloads the model to `dest`, and its manifest next to it when
/// `manifest_url` is given.
///
/// The manifest is fetched and validated before the model download starts.
/// Neither file replaces an existing one unless its download completed and,
/// with `checksum`, the model matched it.
///
/// # Errors
///
/// Returns [`Error::Download`] on network, checksum or file errors and
/// [`Error::ModelLoad`] for an invalid manifest.
pub async fn fetch_model(
    url: &str,
    checksum: Option<&str>,
    manifest_url: Option<&str>,
    dest: &Path,
) -> Result<u64> {
    let manifest = match manifest_url {
        Some(manifest_url) => {
            let content = model_download::download_text(manifest_url).await?;
            ModelManifest::from_toml(&content)?;
            Some(content)
        }
        None => None,
    };

    let mut last_step = None;
    let bytes = model_download::download_model(url, dest, checksum, |progress| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let step = (progress * 10.0).floor() as u32;
        if last_step != Some(step) {
            last_step = Some(step);
            eprintln!("Downloading model... {}%", step * 10);
        }
    })
    .await?;
    info!(path = %dest.display(), bytes, "model downloaded");

    if let Some(content) = manifest {
        model_download::save_text(&ModelManifest::sidecar_path(dest), &content)?;
    }

    Ok(bytes)
}
