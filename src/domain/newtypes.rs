// SPDX-License-Identifier: MPL-2.0
//! Workout newtypes.
//!
//! This module provides type-safe wrappers for tracker settings,
//! ensuring they are always within valid ranges.

use crate::config::defaults::{
    CONFIDENCE_THRESHOLD_STEP, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_STABILITY_FRAMES,
    MAX_CONFIDENCE_THRESHOLD, MAX_STABILITY_FRAMES, MIN_CONFIDENCE_THRESHOLD,
    MIN_STABILITY_FRAMES,
};

// =============================================================================
// ConfidenceThreshold
// =============================================================================

/// Minimum confidence a detection needs to count, guaranteed to be within
/// the valid range and on the 5% grid.
///
/// # Example
///
/// ```
/// use formcheck::domain::newtypes::ConfidenceThreshold;
///
/// assert_eq!(ConfidenceThreshold::new(0.72).value(), 0.7);
/// assert_eq!(ConfidenceThreshold::new(0.99).value(), 0.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThreshold(f32);

impl ConfidenceThreshold {
    /// Creates a threshold, clamping to the valid range and snapping to the step.
    #[must_use]
    pub fn new(value: f32) -> Self {
        let value = if value.is_finite() {
            value
        } else {
            DEFAULT_CONFIDENCE_THRESHOLD
        };
        let clamped = value.clamp(MIN_CONFIDENCE_THRESHOLD, MAX_CONFIDENCE_THRESHOLD);
        let snapped = (clamped / CONFIDENCE_THRESHOLD_STEP).round() * CONFIDENCE_THRESHOLD_STEP;
        // Round away float noise so 0.7 stays 0.7.
        Self((snapped * 100.0).round() / 100.0)
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns `true` if `confidence` meets the threshold.
    #[must_use]
    pub fn accepts(self, confidence: f32) -> bool {
        confidence >= self.0
    }

    /// Threshold as a whole percentage, for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for ConfidenceThreshold {
    fn default() -> Self {
        Self(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

// =============================================================================
// StabilityFrames
// =============================================================================

/// Consecutive frames a pose must hold before it counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityFrames(u32);

impl StabilityFrames {
    /// Creates a frame count, clamping to the valid range.
    #[must_use]
    pub fn new(frames: u32) -> Self {
        Self(frames.clamp(MIN_STABILITY_FRAMES, MAX_STABILITY_FRAMES))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for StabilityFrames {
    fn default() -> Self {
        Self(DEFAULT_STABILITY_FRAMES)
    }
}
