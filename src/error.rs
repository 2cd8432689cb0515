// SPDX-License-Identifier: MPL-2.0
//! Application-level error type.

use crate::application::port::{InferenceError, ModelLoadError};
use crate::media::model_download::DownloadError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("History Error: {0}")]
    History(String),

    #[error("Model Error: {0}")]
    ModelLoad(#[from] ModelLoadError),

    #[error("Inference Error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Download Error: {0}")]
    Download(#[from] DownloadError),

    #[error("Image Error: {0}")]
    Image(String),

    /// Invalid command line.
    #[error("Usage Error: {0}")]
    Usage(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<pico_args::Error> for Error {
    fn from(err: pico_args::Error) -> Self {
        Error::Usage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn model_load_error_converts() {
        let err: Error = ModelLoadError::Session("bad graph".to_string()).into();
        assert!(matches!(err, Error::ModelLoad(_)));
        assert!(err.to_string().contains("bad graph"));
    }

    #[test]
    fn usage_error_from_pico_args() {
        let err: Error = pico_args::Error::MissingArgument.into();
        assert!(matches!(err, Error::Usage(_)));
    }
}
