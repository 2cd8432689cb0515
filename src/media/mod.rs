// SPDX-License-Identifier: MPL-2.0
//! Pixel handling and model artifacts.
//!
//! - [`preprocess`]: Frame to tensor conversion
//! - [`model_download`]: Fetching and verifying model files

pub mod model_download;
pub mod preprocess;

pub use preprocess::{PixelScale, Preprocessor, ResizeMode, TensorLayout};
