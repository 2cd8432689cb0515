// SPDX-License-Identifier: MPL-2.0
//! Command line parsing.

use crate::error::{Error, Result};
use pico_args::Arguments;
use std::ffi::OsString;
use std::path::PathBuf;

/// Frame rate assumed for `workout` when `--fps` is not given.
pub const DEFAULT_WORKOUT_FPS: u32 = 30;

pub const HELP: &str = "\
formcheck - exercise pose classification and rep counting

USAGE:
  formcheck [OPTIONS] <COMMAND>

COMMANDS:
  info                          Show model input size and labels
  classify <IMAGE>...           Classify still images
  workout <FRAME_DIR>           Count reps over a directory of frames
      --fps <N>                 Frame rate of the sequence [default: 30]
  history                       List recorded workouts
      --clear                   Delete all recorded workouts
  fetch-model <URL>             Download the model
      --checksum <HEX>          Expected BLAKE3 digest of the model
      --manifest-url <URL>      Also download the model manifest

OPTIONS:
  --model <PATH>                Model file (manifest next to it as .toml)
  --data-dir <DIR>              Data directory [env: FORMCHECK_DATA_DIR]
  --config-dir <DIR>            Config directory [env: FORMCHECK_CONFIG_DIR]
  --log-level <FILTER>          Log filter, e.g. debug [env: RUST_LOG]
  -h, --help                    Print help
";

/// What to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Info,
    Classify {
        images: Vec<PathBuf>,
    },
    Workout {
        frames: PathBuf,
        fps: u32,
    },
    History {
        clear: bool,
    },
    FetchModel {
        url: String,
        checksum: Option<String>,
        manifest_url: Option<String>,
    },
    Help,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    /// Model path override. Takes precedence over `model_path` in settings.
    pub model: Option<PathBuf>,
    /// Takes precedence over `FORMCHECK_DATA_DIR`.
    pub data_dir: Option<PathBuf>,
    /// Takes precedence over `FORMCHECK_CONFIG_DIR`.
    pub config_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub command: Command,
}

impl Flags {
    /// Parses the process arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for unknown commands, missing values or
    /// leftover arguments.
    pub fn from_env() -> Result<Self> {
        Self::parse(Arguments::from_env())
    }

    /// Parses arguments without the program name.
    ///
    /// # Errors
    ///
    /// See [`Flags::from_env`].
    pub fn from_vec(args: Vec<OsString>) -> Result<Self> {
        Self::parse(Arguments::from_vec(args))
    }

    fn parse(mut args: Arguments) -> Result<Self> {
        let help = args.contains(["-h", "--help"]);
        let model = args.opt_value_from_str("--model")?;
        let data_dir = args.opt_value_from_str("--data-dir")?;
        let config_dir = args.opt_value_from_str("--config-dir")?;
        let log_level = args.opt_value_from_str("--log-level")?;

        let subcommand = args.subcommand()?;
        let command = match (help, subcommand.as_deref()) {
            (true, _) | (false, None | Some("help")) => Command::Help,
            (false, Some("info")) => Command::Info,
            (false, Some("classify")) => {
                let images = free_paths(&mut args)?;
                if images.is_empty() {
                    return Err(Error::Usage("classify needs at least one image".into()));
                }
                Command::Classify { images }
            }
            (false, Some("workout")) => {
                let fps: u32 = args
                    .opt_value_from_str("--fps")?
                    .unwrap_or(DEFAULT_WORKOUT_FPS);
                if fps == 0 {
                    return Err(Error::Usage("--fps must be positive".into()));
                }
                let frames = args.free_from_str()?;
                Command::Workout { frames, fps }
            }
            (false, Some("history")) => Command::History {
                clear: args.contains("--clear"),
            },
            (false, Some("fetch-model")) => {
                let checksum = args.opt_value_from_str("--checksum")?;
                let manifest_url = args.opt_value_from_str("--manifest-url")?;
                let url = args.free_from_str()?;
                Command::FetchModel {
                    url,
                    checksum,
                    manifest_url,
                }
            }
            (false, Some(other)) => {
                return Err(Error::Usage(format!("unknown command '{other}'")));
            }
        };

        let rest = args.finish();
        if command != Command::Help && !rest.is_empty() {
            return Err(Error::Usage(format!(
                "unexpected arguments: {}",
                rest.iter()
                    .map(|a| a.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join(" ")
            )));
        }

        Ok(Self {
            model,
            data_dir,
            config_dir,
            log_level,
            command,
        })
    }
}

/// Takes every remaining argument as a path, rejecting flags.
fn free_paths(args: &mut Arguments) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    while let Some(path) = args.opt_free_from_str::<PathBuf>()? {
        if path.to_string_lossy().starts_with('-') {
            return Err(Error::Usage(format!(
                "unknown option '{}'",
                path.display()
            )));
        }
        paths.push(path);
    }
    Ok(paths)
}
