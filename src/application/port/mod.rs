// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! Infrastructure adapters implement these interfaces. The traits use only
//! domain types, so the application layer never sees ONNX Runtime.
//!
//! # Available Ports
//!
//! - [`classifier`]: Frame classification over an opaque model

pub mod classifier;

// Re-export main types for convenience
pub use classifier::{InferenceError, ModelLoadError, PoseClassifier};
