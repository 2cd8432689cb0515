// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types and rules of pose classification and workouts.
//!
//! This module contains value objects and business rules. Apart from `serde`
//! derives and `chrono` timestamps it has no external dependencies, so it can
//! be tested without a model or a runtime.
//!
//! # Modules
//!
//! - [`frame`]: Borrowed camera frames ([`Frame`](frame::Frame),
//!   [`PixelFormat`](frame::PixelFormat))
//! - [`classification`]: Inference output ([`ClassificationResult`](classification::ClassificationResult),
//!   [`ModelDimensions`](classification::ModelDimensions))
//! - [`exercise`]: Exercises and sessions ([`ExerciseType`](exercise::ExerciseType),
//!   [`WorkoutSession`](exercise::WorkoutSession))
//! - [`newtypes`]: Validated settings ([`ConfidenceThreshold`](newtypes::ConfidenceThreshold),
//!   [`StabilityFrames`](newtypes::StabilityFrames))

pub mod classification;
pub mod exercise;
pub mod frame;
pub mod newtypes;
