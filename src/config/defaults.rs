// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Detection**: Confidence threshold bounds
//! - **Stability**: Frames a pose must hold before it counts
//! - **Frame rate**: FPS measurement window
//! - **Model**: Default model file name

// ==========================================================================
// Detection Defaults
// ==========================================================================

/// Default minimum confidence for a detection to count toward reps.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Minimum allowed confidence threshold.
pub const MIN_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Maximum allowed confidence threshold.
pub const MAX_CONFIDENCE_THRESHOLD: f32 = 0.9;

/// Granularity of the confidence threshold (5%).
pub const CONFIDENCE_THRESHOLD_STEP: f32 = 0.05;

// ==========================================================================
// Stability Defaults
// ==========================================================================

/// Default number of consecutive frames a pose must hold.
pub const DEFAULT_STABILITY_FRAMES: u32 = 10;

/// Minimum stability window.
pub const MIN_STABILITY_FRAMES: u32 = 1;

/// Maximum stability window (four seconds at 30 FPS).
pub const MAX_STABILITY_FRAMES: u32 = 120;

// ==========================================================================
// Frame Rate Defaults
// ==========================================================================

/// Interval over which frames are counted before the FPS value is published.
pub const FPS_WINDOW_MILLIS: i64 = 1000;

// ==========================================================================
// Model Defaults
// ==========================================================================

/// File name of the classifier inside the data directory.
pub const DEFAULT_MODEL_FILENAME: &str = "pose-classifier.onnx";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Confidence validation
    assert!(MIN_CONFIDENCE_THRESHOLD > 0.0);
    assert!(MAX_CONFIDENCE_THRESHOLD < 1.0);
    assert!(MIN_CONFIDENCE_THRESHOLD < MAX_CONFIDENCE_THRESHOLD);
    assert!(DEFAULT_CONFIDENCE_THRESHOLD >= MIN_CONFIDENCE_THRESHOLD);
    assert!(DEFAULT_CONFIDENCE_THRESHOLD <= MAX_CONFIDENCE_THRESHOLD);
    assert!(CONFIDENCE_THRESHOLD_STEP > 0.0);

    // Stability validation
    assert!(MIN_STABILITY_FRAMES > 0);
    assert!(MAX_STABILITY_FRAMES >= MIN_STABILITY_FRAMES);
    assert!(DEFAULT_STABILITY_FRAMES >= MIN_STABILITY_FRAMES);
    assert!(DEFAULT_STABILITY_FRAMES <= MAX_STABILITY_FRAMES);

    assert!(FPS_WINDOW_MILLIS > 0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_defaults_are_valid() {
        assert_eq!(DEFAULT_CONFIDENCE_THRESHOLD, 0.7);
        assert!(DEFAULT_CONFIDENCE_THRESHOLD >= MIN_CONFIDENCE_THRESHOLD);
        assert!(DEFAULT_CONFIDENCE_THRESHOLD <= MAX_CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn stability_defaults_are_valid() {
        assert_eq!(DEFAULT_STABILITY_FRAMES, 10);
        assert!(DEFAULT_STABILITY_FRAMES <= MAX_STABILITY_FRAMES);
    }

    #[test]
    fn model_filename_is_onnx() {
        assert!(DEFAULT_MODEL_FILENAME.ends_with(".onnx"));
    }
}
