// SPDX-License-Identifier: MPL-2.0
//! ONNX Runtime adapter implementing the [`PoseClassifier`] port.
//!
//! [`PoseClassifier`]: crate::application::port::PoseClassifier

use super::manifest::ModelManifest;
use crate::application::port::{InferenceError, ModelLoadError, PoseClassifier};
use crate::domain::classification::{ClassificationResult, ModelDimensions};
use crate::domain::frame::{Frame, PixelFormat};
use crate::media::model_download::{self, DownloadError};
use crate::media::preprocess::{self, Preprocessor};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Input name used when the model does not declare one.
const DEFAULT_INPUT_NAME: &str = "input";

/// Image classifier backed by an ONNX model and its manifest.
///
/// Construction loads, verifies and test-runs the model; a value of this type
/// is always ready. The session is released on drop.
///
/// # Example
///
/// ```no_run
/// use formcheck::application::port::PoseClassifier;
/// use formcheck::domain::frame::{Frame, PixelFormat};
/// use formcheck::infrastructure::onnx::OnnxPoseClassifier;
///
/// let mut classifier = OnnxPoseClassifier::from_path("models/pose.onnx").unwrap();
/// let pixels = vec![0u8; 640 * 480 * 4];
/// let frame = Frame::new(640, 480, PixelFormat::Bgra8, &pixels);
/// let result = classifier.classify(&frame).unwrap();
/// println!("{:?}", result.top());
/// ```
pub struct OnnxPoseClassifier {
    session: Session,
    manifest: ModelManifest,
    preprocessor: Preprocessor,
    input_name: String,
    model_path: PathBuf,
}

impl OnnxPoseClassifier {
    /// Loads the model at `model_path` with the manifest next to it.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelLoadError`] if the model or manifest is missing or
    /// invalid, the checksum does not match, the runtime rejects the model,
    /// or the validation inference fails.
    pub fn from_path(model_path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(ModelLoadError::ModelNotFound(model_path.to_path_buf()));
        }
        let manifest = ModelManifest::load_for(model_path)?;
        Self::with_manifest(model_path, manifest)
    }

    /// Loads the model at `model_path` described by `manifest`.
    ///
    /// # Errors
    ///
    /// See [`OnnxPoseClassifier::from_path`].
    pub fn with_manifest(
        model_path: impl AsRef<Path>,
        manifest: ModelManifest,
    ) -> Result<Self, ModelLoadError> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(ModelLoadError::ModelNotFound(model_path.to_path_buf()));
        }
        manifest.validate()?;

        if let Some(expected) = &manifest.blake3 {
            model_download::verify_checksum(model_path, expected).map_err(|e| match e {
                DownloadError::ChecksumMismatch { expected, actual } => {
                    ModelLoadError::ChecksumMismatch { expected, actual }
                }
                other => ModelLoadError::Io(other.to_string()),
            })?;
        }

        let session = Session::builder()
            .map_err(|e| ModelLoadError::Session(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelLoadError::Session(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| ModelLoadError::Session(e.to_string()))?;

        let input_name = session
            .inputs
            .first()
            .map_or_else(|| DEFAULT_INPUT_NAME.to_string(), |i| i.name.clone());

        let mut classifier = Self {
            session,
            preprocessor: manifest.preprocessor(),
            manifest,
            input_name,
            model_path: model_path.to_path_buf(),
        };
        classifier.validate()?;

        info!(
            model = %classifier.model_path.display(),
            width = classifier.input_width(),
            height = classifier.input_height(),
            labels = classifier.manifest.labels.len(),
            "pose classifier ready"
        );
        Ok(classifier)
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    #[must_use]
    pub fn manifest(&self) -> &ModelManifest {
        &self.manifest
    }

    /// Runs one inference on a mid-gray frame and checks the output width.
    fn validate(&mut self) -> Result<(), ModelLoadError> {
        let dims = self.manifest.dimensions();
        let pixels = preprocess::neutral_gray_pixels(dims);
        let frame = Frame::new(dims.width(), dims.height(), PixelFormat::Rgb8, &pixels);

        let scores = self
            .run(&frame)
            .map_err(|e| ModelLoadError::Validation(e.to_string()))?;

        match scores_to_result(&self.manifest.labels, scores, self.manifest.apply_softmax) {
            Ok(_) => Ok(()),
            Err(InferenceError::OutputShape { expected, actual }) => {
                Err(ModelLoadError::LabelMismatch {
                    labels: expected,
                    outputs: actual,
                })
            }
            Err(e) => Err(ModelLoadError::Validation(e.to_string())),
        }
    }

    /// Preprocesses the frame and returns the raw output scores.
    fn run(&mut self, frame: &Frame<'_>) -> Result<Vec<f32>, InferenceError> {
        let input_tensor = self.preprocessor.prepare(frame)?;

        let input_ref = ort::value::TensorRef::from_array_view(&input_tensor)
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_ref])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let (_, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| InferenceError::Runtime("model produced no output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e: ort::Error| InferenceError::Runtime(e.to_string()))?;

        Ok(data.to_vec())
    }
}

impl PoseClassifier for OnnxPoseClassifier {
    fn classify(&mut self, frame: &Frame<'_>) -> Result<ClassificationResult, InferenceError> {
        let scores = self.run(frame)?;
        debug!(
            width = frame.width(),
            height = frame.height(),
            format = %frame.format(),
            "classified frame"
        );
        scores_to_result(&self.manifest.labels, scores, self.manifest.apply_softmax)
    }

    fn labels(&self) -> &[String] {
        &self.manifest.labels
    }

    fn dimensions(&self) -> ModelDimensions {
        self.manifest.dimensions()
    }
}

/// Turns one raw output row into a result keyed by `labels`.
///
/// The row must hold exactly one score per label. With `apply_softmax` the
/// scores are normalized first. A NaN or infinite score fails the frame
/// rather than reaching detection.
pub(crate) fn scores_to_result(
    labels: &[String],
    mut scores: Vec<f32>,
    apply_softmax: bool,
) -> Result<ClassificationResult, InferenceError> {
    let shape_error = |actual| InferenceError::OutputShape {
        expected: labels.len(),
        actual,
    };
    if scores.len() != labels.len() {
        return Err(shape_error(scores.len()));
    }
    if apply_softmax {
        softmax(&mut scores);
    }
    if let Some(index) = scores.iter().position(|score| !score.is_finite()) {
        return Err(InferenceError::Runtime(format!(
            "model produced non-finite score {} for {}",
            scores[index], labels[index]
        )));
    }
    ClassificationResult::from_scores(labels, &scores).ok_or_else(|| shape_error(scores.len()))
}

/// In-place numerically stable softmax.
pub(crate) fn softmax(scores: &mut [f32]) {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return;
    }
    let mut sum = 0.0;
    for score in scores.iter_mut() {
        *score = (*score - max).exp();
        sum += *score;
    }
    if sum > 0.0 {
        for score in scores.iter_mut() {
            *score /= sum;
        }
    }
}
