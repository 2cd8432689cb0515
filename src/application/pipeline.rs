// SPDX-License-Identifier: MPL-2.0
//! Per-frame processing: classify, detect, count.

use super::detection::Detection;
use super::port::{InferenceError, PoseClassifier};
use super::workout::{RepEvent, WorkoutTracker};
use crate::config::defaults::FPS_WINDOW_MILLIS;
use crate::domain::classification::ClassificationResult;
use crate::domain::frame::Frame;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

// =============================================================================
// FpsCounter
// =============================================================================

/// Counts processed frames and publishes the count once per window.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    window_start: Option<DateTime<Utc>>,
    fps: u32,
}

impl FpsCounter {
    /// Records one frame at `now`. Returns the new value when it is published.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<u32> {
        let window_start = *self.window_start.get_or_insert(now);
        self.frames += 1;

        if now - window_start >= Duration::milliseconds(FPS_WINDOW_MILLIS) {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Some(now);
            Some(self.fps)
        } else {
            None
        }
    }

    /// Last published frame rate.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

// =============================================================================
// FrameProcessor
// =============================================================================

/// Outcome of processing one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub result: ClassificationResult,
    pub detection: Detection,
    /// Set when this frame completed a rep.
    pub rep: Option<RepEvent>,
}

/// Runs frames through a classifier and a workout tracker.
pub struct FrameProcessor<C> {
    classifier: C,
    tracker: WorkoutTracker,
    fps: FpsCounter,
}

impl<C: PoseClassifier> FrameProcessor<C> {
    #[must_use]
    pub fn new(classifier: C, tracker: WorkoutTracker) -> Self {
        Self {
            classifier,
            tracker,
            fps: FpsCounter::default(),
        }
    }

    /// Processes one frame captured at `now`.
    ///
    /// # Errors
    ///
    /// Returns the classifier's [`InferenceError`]. The tracker is not fed and
    /// the frame does not count toward the frame rate.
    pub fn process(
        &mut self,
        frame: &Frame<'_>,
        now: DateTime<Utc>,
    ) -> Result<FrameReport, InferenceError> {
        let result = match self.classifier.classify(frame) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "frame classification failed");
                return Err(e);
            }
        };

        let detection = Detection::from_result(&result);
        let rep = self
            .tracker
            .process_detection(detection.exercise, detection.confidence);

        if let Some(fps) = self.fps.tick(now) {
            debug!(fps, "frame rate");
        }

        Ok(FrameReport {
            result,
            detection,
            rep,
        })
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    #[must_use]
    pub fn tracker(&self) -> &WorkoutTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut WorkoutTracker {
        &mut self.tracker
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Releases the classifier.
    pub fn into_classifier(self) -> C {
        self.classifier
    }
}
