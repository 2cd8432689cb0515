// SPDX-License-Identifier: MPL-2.0
//! Command line application: wiring flags, settings, history and the model.
//!
//! [`run`] resolves directories, loads settings and dispatches to the command
//! functions in [`commands`]. Only `fetch-model` needs an async runtime; it
//! gets a current-thread tokio runtime for the duration of the download.

pub mod cli;
pub mod commands;
pub mod history;
pub mod paths;

pub use cli::{Command, Flags};
pub use history::WorkoutHistory;

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::infrastructure::onnx::OnnxPoseClassifier;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Runs the parsed command line, writing command output to `out`.
///
/// # Errors
///
/// Returns the first error of the command.
pub fn run(flags: Flags, out: &mut impl Write) -> Result<()> {
    let Flags {
        model,
        data_dir,
        config_dir,
        command,
        ..
    } = flags;
    paths::init_cli_overrides(data_dir, config_dir);

    let config = config::load()?;
    let model_path = || resolve_model_path(model.clone(), &config);

    match command {
        Command::Help => write!(out, "{}", cli::HELP)?,
        Command::Info => {
            let path = model_path()?;
            let classifier = open_classifier(path.clone())?;
            writeln!(out, "Model: {}", path.display())?;
            commands::describe(&classifier, out)?;
        }
        Command::Classify { images } => {
            let mut classifier = open_classifier(model_path()?)?;
            commands::classify_images(&mut classifier, &images, out)?;
        }
        Command::Workout { frames, fps } => {
            let files = commands::frame_files(&frames)?;
            if files.is_empty() {
                return Err(Error::Usage(format!(
                    "no frames found in {}",
                    frames.display()
                )));
            }
            let classifier = open_classifier(model_path()?)?;
            let session =
                commands::run_workout(classifier, &files, fps, &config, chrono::Utc::now(), out)?;
            if let Some(session) = session {
                WorkoutHistory::load().record(session)?;
            }
        }
        Command::History { clear } => {
            let mut history = WorkoutHistory::load();
            if clear {
                history.clear()?;
                writeln!(out, "History cleared")?;
            } else {
                commands::show_history(&history, out)?;
            }
        }
        Command::FetchModel {
            url,
            checksum,
            manifest_url,
        } => {
            let dest = model_path()?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let bytes = runtime.block_on(commands::fetch_model(
                &url,
                checksum.as_deref(),
                manifest_url.as_deref(),
                &dest,
            ))?;
            writeln!(out, "Saved {bytes} bytes to {}", dest.display())?;
        }
    }
    Ok(())
}

/// Model path: `--model`, then `model_path` from settings, then the data directory.
///
/// # Errors
///
/// Returns [`Error::Config`] if no data directory can be determined.
pub fn resolve_model_path(cli: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    cli.or_else(|| config.model_path.clone())
        .or_else(paths::default_model_path)
        .ok_or_else(|| Error::Config("cannot determine a model path, use --model".to_string()))
}

fn open_classifier(path: PathBuf) -> Result<OnnxPoseClassifier> {
    info!(path = %path.display(), "loading model");
    Ok(OnnxPoseClassifier::from_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_model_path_wins() {
        let config = Config {
            model_path: Some(PathBuf::from("/from/settings.onnx")),
            ..Config::default()
        };
        let path = resolve_model_path(Some(PathBuf::from("/from/cli.onnx")), &config).unwrap();
        assert_eq!(path, PathBuf::from("/from/cli.onnx"));
    }

    #[test]
    fn settings_model_path_beats_default() {
        let config = Config {
            model_path: Some(PathBuf::from("/from/settings.onnx")),
            ..Config::default()
        };
        let path = resolve_model_path(None, &config).unwrap();
        assert_eq!(path, PathBuf::from("/from/settings.onnx"));
    }
}
