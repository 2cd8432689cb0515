// SPDX-License-Identifier: MPL-2.0
//! Deterministic classifier for tests and dry runs.

use crate::application::port::{InferenceError, ModelLoadError, PoseClassifier};
use crate::domain::classification::{ClassificationResult, ModelDimensions};
use crate::domain::frame::Frame;

/// Classifier that replays a script of score vectors, one per call, looping
/// back to the start when it runs out.
///
/// Frames are validated exactly as the ONNX adapter validates them, so
/// empty or truncated buffers fail the same way.
#[derive(Debug, Clone)]
pub struct FakePoseClassifier {
    labels: Vec<String>,
    dimensions: ModelDimensions,
    script: Vec<Vec<f32>>,
    cursor: usize,
}

impl FakePoseClassifier {
    /// Creates a classifier that always returns `scores`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::LabelMismatch`] if `scores` does not have one
    /// entry per label.
    pub fn fixed<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        dimensions: ModelDimensions,
        scores: Vec<f32>,
    ) -> Result<Self, ModelLoadError> {
        Self::scripted(labels, dimensions, vec![scores])
    }

    /// Creates a classifier that walks through `script` call by call.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::InvalidManifest`] for an empty label set or
    /// script, and [`ModelLoadError::LabelMismatch`] for a step with the wrong
    /// number of scores.
    pub fn scripted<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        dimensions: ModelDimensions,
        script: Vec<Vec<f32>>,
    ) -> Result<Self, ModelLoadError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(ModelLoadError::InvalidManifest(
                "labels must not be empty".to_string(),
            ));
        }
        if script.is_empty() {
            return Err(ModelLoadError::InvalidManifest(
                "script must not be empty".to_string(),
            ));
        }
        if let Some(step) = script.iter().find(|step| step.len() != labels.len()) {
            return Err(ModelLoadError::LabelMismatch {
                labels: labels.len(),
                outputs: step.len(),
            });
        }
        Ok(Self {
            labels,
            dimensions,
            script,
            cursor: 0,
        })
    }

    /// Number of successful classifications so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.cursor
    }
}

impl PoseClassifier for FakePoseClassifier {
    fn classify(&mut self, frame: &Frame<'_>) -> Result<ClassificationResult, InferenceError> {
        InferenceError::check_frame(frame)?;
        let scores = &self.script[self.cursor % self.script.len()];
        let result = ClassificationResult::from_scores(&self.labels, scores).ok_or(
            InferenceError::OutputShape {
                expected: self.labels.len(),
                actual: scores.len(),
            },
        )?;
        self.cursor += 1;
        Ok(result)
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn dimensions(&self) -> ModelDimensions {
        self.dimensions
    }
}
