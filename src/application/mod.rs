// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: The [`PoseClassifier`](port::PoseClassifier) boundary that
//!   inference adapters implement
//! - [`detection`]: One exercise per classified frame
//! - [`workout`]: Rep counting and session building
//! - [`pipeline`]: Per-frame processing and frame rate
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The binary wires concrete adapters into [`pipeline::FrameProcessor`]
//!
//! # Example
//!
//! ```
//! use formcheck::application::pipeline::FrameProcessor;
//! use formcheck::application::workout::WorkoutTracker;
//! use formcheck::domain::classification::ModelDimensions;
//! use formcheck::domain::frame::{Frame, PixelFormat};
//! use formcheck::infrastructure::fake::FakePoseClassifier;
//!
//! let dims = ModelDimensions::new(32, 32).unwrap();
//! let classifier = FakePoseClassifier::fixed(["lunge", "standing"], dims, vec![0.8, 0.2]).unwrap();
//! let mut processor = FrameProcessor::new(classifier, WorkoutTracker::default());
//!
//! let pixels = vec![0u8; 32 * 32 * 3];
//! let frame = Frame::new(32, 32, PixelFormat::Rgb8, &pixels);
//! let report = processor.process(&frame, chrono::Utc::now()).unwrap();
//! assert_eq!(report.detection.confidence, 0.8);
//! ```

pub mod detection;
pub mod pipeline;
pub mod port;
pub mod workout;
