// SPDX-License-Identifier: MPL-2.0
//! ONNX Runtime adapter implementing the [`PoseClassifier`] port trait.
//!
//! A model artifact is a `.onnx` file plus a `.toml` manifest next to it that
//! declares the input size, the label set and how frames become tensors.
//!
//! [`PoseClassifier`]: crate::application::port::PoseClassifier

pub mod classifier;
pub mod manifest;

pub use classifier::OnnxPoseClassifier;
pub use manifest::ModelManifest;
