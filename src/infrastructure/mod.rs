// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`onnx`]: Classification via ONNX Runtime (implements [`PoseClassifier`])
//! - [`fake`]: Scripted scores without a model (implements [`PoseClassifier`])
//!
//! [`PoseClassifier`]: crate::application::port::PoseClassifier

pub mod fake;
pub mod onnx;

// Re-export main types for convenience
pub use fake::FakePoseClassifier;
pub use onnx::{ModelManifest, OnnxPoseClassifier};
