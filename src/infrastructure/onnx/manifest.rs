// SPDX-License-Identifier: MPL-2.0
//! Model manifest: the TOML sidecar that describes an ONNX classifier.
//!
//! The manifest lives next to the model with a `.toml` extension:
//!
//! ```toml
//! input_width = 96
//! input_height = 96
//! labels = ["arm_raise", "lunge", "standing"]
//! layout = "nchw"
//! pixel_scale = "unit"
//! resize_mode = "squash"
//! apply_softmax = false
//! blake3 = "…"
//! ```

use crate::application::port::ModelLoadError;
use crate::domain::classification::ModelDimensions;
use crate::media::preprocess::{PixelScale, Preprocessor, ResizeMode, TensorLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub input_width: u32,
    pub input_height: u32,
    /// Output labels in tensor order.
    pub labels: Vec<String>,
    #[serde(default)]
    pub layout: TensorLayout,
    #[serde(default)]
    pub pixel_scale: PixelScale,
    #[serde(default)]
    pub resize_mode: ResizeMode,
    /// Apply softmax to raw outputs (for models that emit logits).
    #[serde(default)]
    pub apply_softmax: bool,
    /// Expected BLAKE3 hex digest of the model file.
    #[serde(default)]
    pub blake3: Option<String>,
}

impl ModelManifest {
    /// Path of the manifest belonging to `model_path`.
    #[must_use]
    pub fn sidecar_path(model_path: &Path) -> PathBuf {
        model_path.with_extension("toml")
    }

    /// Reads and validates the manifest next to `model_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::ManifestNotFound`] when the sidecar is
    /// missing and [`ModelLoadError::InvalidManifest`] when it does not parse
    /// or fails validation.
    pub fn load_for(model_path: &Path) -> Result<Self, ModelLoadError> {
        let path = Self::sidecar_path(model_path);
        if !path.exists() {
            return Err(ModelLoadError::ManifestNotFound(path));
        }
        let content = fs::read_to_string(&path).map_err(|e| ModelLoadError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::InvalidManifest`] on parse or validation failure.
    pub fn from_toml(content: &str) -> Result<Self, ModelLoadError> {
        let manifest: Self =
            toml::from_str(content).map_err(|e| ModelLoadError::InvalidManifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Checks dimensions, label set and checksum format.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::InvalidManifest`] describing the first problem.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if ModelDimensions::new(self.input_width, self.input_height).is_none() {
            return Err(ModelLoadError::InvalidManifest(format!(
                "input size must be positive, got {}x{}",
                self.input_width, self.input_height
            )));
        }
        if self.labels.is_empty() {
            return Err(ModelLoadError::InvalidManifest(
                "labels must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for label in &self.labels {
            if label.trim().is_empty() {
                return Err(ModelLoadError::InvalidManifest(
                    "labels must not be blank".to_string(),
                ));
            }
            if !seen.insert(label.as_str()) {
                return Err(ModelLoadError::InvalidManifest(format!(
                    "duplicate label \"{label}\""
                )));
            }
        }
        if let Some(hash) = &self.blake3 {
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ModelLoadError::InvalidManifest(
                    "blake3 must be a 64-character hex digest".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Input dimensions. Only call on a validated manifest.
    #[must_use]
    pub fn dimensions(&self) -> ModelDimensions {
        ModelDimensions::at_least_one(self.input_width, self.input_height)
    }

    #[must_use]
    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor {
            dimensions: self.dimensions(),
            resize_mode: self.resize_mode,
            layout: self.layout,
            scale: self.pixel_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
input_width = 96
input_height = 96
labels = ["arm_raise", "lunge", "standing"]
"#;

    #[test]
    fn minimal_manifest_uses_defaults() {
        let manifest = ModelManifest::from_toml(MINIMAL).unwrap();
        assert_eq!(manifest.dimensions(), ModelDimensions::new(96, 96).unwrap());
        assert_eq!(manifest.layout, TensorLayout::Nchw);
        assert_eq!(manifest.pixel_scale, PixelScale::Unit);
        assert_eq!(manifest.resize_mode, ResizeMode::Squash);
        assert!(!manifest.apply_softmax);
        assert!(manifest.blake3.is_none());
    }

    #[test]
    fn full_manifest_parses_enums() {
        let content = r#"
input_width = 220
input_height = 220
labels = ["a", "b"]
layout = "nhwc"
pixel_scale = "byte"
resize_mode = "fit-longest"
apply_softmax = true
"#;
        let manifest = ModelManifest::from_toml(content).unwrap();
        assert_eq!(manifest.layout, TensorLayout::Nhwc);
        assert_eq!(manifest.pixel_scale, PixelScale::Byte);
        assert_eq!(manifest.resize_mode, ResizeMode::FitLongest);
        assert!(manifest.apply_softmax);
    }

    #[test]
    fn rejects_zero_size() {
        let content = MINIMAL.replace("input_width = 96", "input_width = 0");
        assert!(matches!(
            ModelManifest::from_toml(&content),
            Err(ModelLoadError::InvalidManifest(_))
        ));
    }

    #[test]
    fn rejects_duplicate_labels() {
        let content = r#"
input_width = 8
input_height = 8
labels = ["lunge", "lunge"]
"#;
        let err = ModelManifest::from_toml(content).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_malformed_checksum() {
        let content = format!("{MINIMAL}blake3 = \"not-hex\"\n");
        assert!(ModelManifest::from_toml(&content).is_err());
    }

    #[test]
    fn rejects_unparseable_toml() {
        assert!(matches!(
            ModelManifest::from_toml("labels = = ["),
            Err(ModelLoadError::InvalidManifest(_))
        ));
    }

    #[test]
    fn load_for_reads_sidecar() {
        let dir = tempdir().expect("create temp dir");
        let model = dir.path().join("pose.onnx");
        fs::write(dir.path().join("pose.toml"), MINIMAL).unwrap();

        let manifest = ModelManifest::load_for(&model).unwrap();
        assert_eq!(manifest.labels.len(), 3);
    }

    #[test]
    fn load_for_reports_missing_sidecar() {
        let dir = tempdir().expect("create temp dir");
        let model = dir.path().join("pose.onnx");
        assert!(matches!(
            ModelManifest::load_for(&model),
            Err(ModelLoadError::ManifestNotFound(_))
        ));
    }
}
