// SPDX-License-Identifier: MPL-2.0
//! Pose classification port definition.
//!
//! This module defines the [`PoseClassifier`] trait, the call boundary between
//! application code and an opaque pre-trained image classifier.
//!
//! # Design Notes
//!
//! - `classify` takes `&mut self`: one call in flight per instance, enforced
//!   by the borrow checker. Share an adapter across threads with a `Mutex`.
//! - Implementations are `Send` so they can be moved to a worker thread.
//! - Frames are borrowed for the call only and never retained.

use crate::domain::classification::{ClassificationResult, ModelDimensions};
use crate::domain::frame::{Frame, FrameDefect, PixelFormat};
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// ModelLoadError
// =============================================================================

/// Construction-time failure. No usable classifier exists afterwards.
#[derive(Debug, Clone, Error)]
pub enum ModelLoadError {
    /// The model artifact does not exist.
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// The manifest describing the model does not exist.
    #[error("model manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// The manifest exists but is malformed or inconsistent.
    #[error("invalid model manifest: {0}")]
    InvalidManifest(String),

    /// The artifact does not match its published checksum.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// The runtime rejected the artifact (corrupt file, unsupported opset).
    #[error("failed to create inference session: {0}")]
    Session(String),

    /// The model output does not line up with the declared labels.
    #[error("model produces {outputs} scores but declares {labels} labels")]
    LabelMismatch { labels: usize, outputs: usize },

    /// The validation inference failed.
    #[error("model validation failed: {0}")]
    Validation(String),

    /// Reading the model or manifest from disk failed.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// InferenceError
// =============================================================================

/// Per-call failure. The classifier stays usable; retry with another frame.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    /// The frame buffer cannot be interpreted.
    #[error("invalid {format} frame: {defect}")]
    InvalidFrame {
        format: PixelFormat,
        defect: FrameDefect,
    },

    /// Converting the frame to an input tensor failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// The runtime failed while running the model.
    #[error("inference failed: {0}")]
    Runtime(String),

    /// The output tensor does not have one score per label.
    #[error("unexpected output: {expected} labels, {actual} scores")]
    OutputShape { expected: usize, actual: usize },
}

impl InferenceError {
    /// Validates `frame`, mapping defects to [`InferenceError::InvalidFrame`].
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is empty or inconsistent with its geometry.
    pub fn check_frame(frame: &Frame<'_>) -> Result<(), Self> {
        frame
            .validate()
            .map_err(|defect| InferenceError::InvalidFrame {
                format: frame.format(),
                defect,
            })
    }
}

// =============================================================================
// PoseClassifier Trait
// =============================================================================

/// Port for frame classification.
///
/// # Example
///
/// ```ignore
/// use formcheck::application::port::PoseClassifier;
///
/// fn best_label(classifier: &mut impl PoseClassifier, frame: &Frame<'_>) -> Option<String> {
///     let result = classifier.classify(frame).ok()?;
///     result.top().map(|(label, _)| label.to_string())
/// }
/// ```
pub trait PoseClassifier: Send {
    /// Classifies one frame.
    ///
    /// Frames whose size differs from [`input_width`](Self::input_width) x
    /// [`input_height`](Self::input_height) are resized first. On success the
    /// result holds one score per label in [`labels`](Self::labels).
    ///
    /// # Errors
    ///
    /// Returns an [`InferenceError`] if the frame is empty or malformed, or if
    /// the runtime fails. No partial result is produced.
    fn classify(&mut self, frame: &Frame<'_>) -> Result<ClassificationResult, InferenceError>;

    /// Fixed label set of the loaded model.
    fn labels(&self) -> &[String];

    /// Input dimensions of the loaded model.
    fn dimensions(&self) -> ModelDimensions;

    /// Width the model expects.
    fn input_width(&self) -> u32 {
        self.dimensions().width()
    }

    /// Height the model expects.
    fn input_height(&self) -> u32 {
        self.dimensions().height()
    }
}

impl<C: PoseClassifier + ?Sized> PoseClassifier for Box<C> {
    fn classify(&mut self, frame: &Frame<'_>) -> Result<ClassificationResult, InferenceError> {
        (**self).classify(frame)
    }

    fn labels(&self) -> &[String] {
        (**self).labels()
    }

    fn dimensions(&self) -> ModelDimensions {
        (**self).dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_load_error_display() {
        let err = ModelLoadError::ChecksumMismatch {
            expected: "abc".to_string(),
            actual: "def".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("abc"));
        assert!(display.contains("def"));

        let err = ModelLoadError::LabelMismatch {
            labels: 3,
            outputs: 4,
        };
        assert_eq!(
            err.to_string(),
            "model produces 4 scores but declares 3 labels"
        );
    }

    #[test]
    fn check_frame_reports_format() {
        let frame = Frame::new(96, 96, PixelFormat::Bgra8, &[]);
        let err = InferenceError::check_frame(&frame).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::InvalidFrame {
                format: PixelFormat::Bgra8,
                defect: FrameDefect::Empty
            }
        ));
        assert_eq!(err.to_string(), "invalid BGRA8 frame: frame buffer is empty");
    }

    #[test]
    fn check_frame_rejects_unaddressable_stride() {
        let pixels = [0u8; 16];
        let frame = Frame::with_stride(2, 4, usize::MAX / 2, PixelFormat::Gray8, &pixels);
        assert!(matches!(
            InferenceError::check_frame(&frame),
            Err(InferenceError::InvalidFrame {
                format: PixelFormat::Gray8,
                defect: FrameDefect::GeometryOverflow { .. }
            })
        ));
    }

    struct Constant {
        labels: Vec<String>,
    }

    impl PoseClassifier for Constant {
        fn classify(
            &mut self,
            frame: &Frame<'_>,
        ) -> Result<ClassificationResult, InferenceError> {
            InferenceError::check_frame(frame)?;
            let scores = vec![1.0 / self.labels.len() as f32; self.labels.len()];
            ClassificationResult::from_scores(&self.labels, &scores).ok_or(
                InferenceError::OutputShape {
                    expected: self.labels.len(),
                    actual: scores.len(),
                },
            )
        }

        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn dimensions(&self) -> ModelDimensions {
            ModelDimensions::new(96, 64).unwrap()
        }
    }

    #[test]
    fn boxed_classifier_forwards() {
        let mut boxed: Box<dyn PoseClassifier> = Box::new(Constant {
            labels: vec!["a".to_string(), "b".to_string()],
        });
        assert_eq!(boxed.input_width(), 96);
        assert_eq!(boxed.input_height(), 64);

        let pixels = vec![0u8; 4];
        let frame = Frame::new(2, 2, PixelFormat::Gray8, &pixels);
        let result = boxed.classify(&frame).unwrap();
        assert!(result.covers(boxed.labels()));
    }
}
