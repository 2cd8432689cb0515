// SPDX-License-Identifier: MPL-2.0
//! Rep counting over a stream of detections.
//!
//! A rep is a transition out of `Standing` into a movement pose and back, where
//! each pose must hold for [`StabilityFrames`] consecutive frames at or above
//! the [`ConfidenceThreshold`].

use crate::domain::exercise::{ExerciseCount, ExerciseType, WorkoutSession};
use crate::domain::newtypes::{ConfidenceThreshold, StabilityFrames};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Tunables for [`WorkoutTracker`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackerSettings {
    pub confidence_threshold: ConfidenceThreshold,
    pub stability_frames: StabilityFrames,
}

/// Emitted when a rep completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepEvent {
    pub exercise: ExerciseType,
    /// Reps of this exercise so far in the workout, including this one.
    pub total: u32,
}

/// Workout state machine.
#[derive(Debug, Clone)]
pub struct WorkoutTracker {
    settings: TrackerSettings,
    started_at: Option<DateTime<Utc>>,
    reps: BTreeMap<ExerciseType, u32>,
    last_stable: ExerciseType,
    current: ExerciseType,
    stable_frames: u32,
}

impl WorkoutTracker {
    #[must_use]
    pub fn new(settings: TrackerSettings) -> Self {
        let mut tracker = Self {
            settings,
            started_at: None,
            reps: BTreeMap::new(),
            last_stable: ExerciseType::Standing,
            current: ExerciseType::Standing,
            stable_frames: 0,
        };
        tracker.reset_reps();
        tracker
    }

    #[must_use]
    pub fn settings(&self) -> TrackerSettings {
        self.settings
    }

    /// Replaces the settings. Takes effect from the next detection.
    pub fn set_settings(&mut self, settings: TrackerSettings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts a workout at `now`, discarding any previous counts.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.reset_reps();
        self.last_stable = ExerciseType::Standing;
        self.current = ExerciseType::Standing;
        self.stable_frames = 0;
        info!(at = %now, "workout started");
    }

    /// Ends the workout at `now`.
    ///
    /// Returns the finished session if at least one rep was counted. Calling
    /// this while inactive does nothing and returns `None`.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<WorkoutSession> {
        let started_at = self.started_at.take()?;
        let duration_secs = Self::seconds_between(started_at, now);

        let mut exercises: Vec<ExerciseCount> = self
            .reps
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&exercise, &count)| ExerciseCount { exercise, count })
            .collect();
        exercises.sort_by_key(|e| e.exercise.display_name());

        let session = WorkoutSession::new(started_at, duration_secs, exercises);
        info!(
            reps = session.total_reps(),
            duration_secs = session.duration_secs,
            "workout stopped"
        );
        (session.total_reps() > 0).then_some(session)
    }

    /// Feeds one detection.
    ///
    /// Ignored unless a workout is active and `confidence` meets the threshold.
    pub fn process_detection(
        &mut self,
        exercise: ExerciseType,
        confidence: f32,
    ) -> Option<RepEvent> {
        if !self.is_active() || !self.settings.confidence_threshold.accepts(confidence) {
            return None;
        }

        if exercise == self.current {
            self.stable_frames = self.stable_frames.saturating_add(1);
        } else {
            self.stable_frames = 1;
            self.current = exercise;
        }

        if self.stable_frames >= self.settings.stability_frames.value() {
            self.on_stable(exercise)
        } else {
            None
        }
    }

    fn on_stable(&mut self, exercise: ExerciseType) -> Option<RepEvent> {
        if self.last_stable == ExerciseType::Standing && exercise.is_movement() {
            debug!(%exercise, "entered movement pose");
            self.last_stable = exercise;
            None
        } else if self.last_stable != ExerciseType::Standing && exercise == ExerciseType::Standing {
            let completed = self.last_stable;
            let count = self.reps.entry(completed).or_insert(0);
            *count += 1;
            let event = RepEvent {
                exercise: completed,
                total: *count,
            };
            self.last_stable = ExerciseType::Standing;
            info!(exercise = %completed, total = event.total, "rep counted");
            Some(event)
        } else {
            None
        }
    }

    /// Reps counted for `exercise` in the current workout.
    #[must_use]
    pub fn reps(&self, exercise: ExerciseType) -> u32 {
        self.reps.get(&exercise).copied().unwrap_or(0)
    }

    /// Sum of all reps in the current workout.
    #[must_use]
    pub fn total_reps(&self) -> u32 {
        self.reps.values().sum()
    }

    /// Seconds since the workout started, or zero when inactive.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        self.started_at
            .map_or(0.0, |start| Self::seconds_between(start, now))
    }

    fn reset_reps(&mut self) {
        self.reps = ExerciseType::COUNTED.iter().map(|&e| (e, 0)).collect();
    }

    #[allow(clippy::cast_precision_loss)]
    fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        ((end - start).num_milliseconds().max(0) as f64) / 1000.0
    }
}

impl Default for WorkoutTracker {
    fn default() -> Self {
        Self::new(TrackerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap()
    }

    fn hold(tracker: &mut WorkoutTracker, exercise: ExerciseType, frames: u32) -> Vec<RepEvent> {
        (0..frames)
            .filter_map(|_| tracker.process_detection(exercise, 0.9))
            .collect()
    }

    #[test]
    fn ignores_detections_when_inactive() {
        let mut tracker = WorkoutTracker::default();
        hold(&mut tracker, ExerciseType::ArmRaise, 20);
        hold(&mut tracker, ExerciseType::Standing, 20);
        assert_eq!(tracker.total_reps(), 0);
    }

    #[test]
    fn counts_a_rep_after_returning_to_standing() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());

        assert!(hold(&mut tracker, ExerciseType::ArmRaise, 10).is_empty());
        let events = hold(&mut tracker, ExerciseType::Standing, 10);

        assert_eq!(
            events,
            vec![RepEvent {
                exercise: ExerciseType::ArmRaise,
                total: 1
            }]
        );
        assert_eq!(tracker.reps(ExerciseType::ArmRaise), 1);
    }

    #[test]
    fn short_poses_do_not_count() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());

        hold(&mut tracker, ExerciseType::Lunge, 9);
        hold(&mut tracker, ExerciseType::Standing, 10);
        assert_eq!(tracker.total_reps(), 0);
    }

    #[test]
    fn low_confidence_frames_are_skipped() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());

        for _ in 0..10 {
            tracker.process_detection(ExerciseType::Lunge, 0.9);
            // Interleaved weak frames neither reset nor extend the streak.
            tracker.process_detection(ExerciseType::Standing, 0.3);
        }
        hold(&mut tracker, ExerciseType::Standing, 10);
        assert_eq!(tracker.reps(ExerciseType::Lunge), 1);
    }

    #[test]
    fn switching_movements_counts_first_only_after_standing() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());

        hold(&mut tracker, ExerciseType::ArmRaise, 10);
        hold(&mut tracker, ExerciseType::Lunge, 10);
        hold(&mut tracker, ExerciseType::Standing, 10);

        assert_eq!(tracker.reps(ExerciseType::ArmRaise), 1);
        assert_eq!(tracker.reps(ExerciseType::Lunge), 0);
    }

    #[test]
    fn holding_standing_longer_counts_once() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());

        hold(&mut tracker, ExerciseType::Lunge, 10);
        let events = hold(&mut tracker, ExerciseType::Standing, 40);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unknown_pose_never_starts_a_rep() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());

        hold(&mut tracker, ExerciseType::Unknown, 20);
        hold(&mut tracker, ExerciseType::Standing, 20);
        assert_eq!(tracker.total_reps(), 0);
    }

    #[test]
    fn stop_builds_sorted_session() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());
        for _ in 0..2 {
            hold(&mut tracker, ExerciseType::Lunge, 10);
            hold(&mut tracker, ExerciseType::Standing, 10);
        }
        hold(&mut tracker, ExerciseType::ArmRaise, 10);
        hold(&mut tracker, ExerciseType::Standing, 10);

        let session = tracker.stop(t0() + Duration::seconds(95)).unwrap();
        assert!(!tracker.is_active());
        assert_eq!(session.total_reps(), 3);
        assert_eq!(session.date, t0());
        assert!((session.duration_secs - 95.0).abs() < f64::EPSILON);
        let order: Vec<_> = session.exercises.iter().map(|e| e.exercise).collect();
        assert_eq!(order, vec![ExerciseType::ArmRaise, ExerciseType::Lunge]);
    }

    #[test]
    fn stop_without_reps_returns_none() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());
        assert!(tracker.stop(t0() + Duration::seconds(30)).is_none());
        assert!(tracker.stop(t0()).is_none());
    }

    #[test]
    fn start_resets_previous_counts() {
        let mut tracker = WorkoutTracker::default();
        tracker.start(t0());
        hold(&mut tracker, ExerciseType::Lunge, 10);
        hold(&mut tracker, ExerciseType::Standing, 10);
        tracker.start(t0() + Duration::minutes(5));
        assert_eq!(tracker.total_reps(), 0);
    }

    #[test]
    fn stricter_settings_apply() {
        let mut tracker = WorkoutTracker::new(TrackerSettings {
            confidence_threshold: ConfidenceThreshold::new(0.9),
            stability_frames: StabilityFrames::new(3),
        });
        tracker.start(t0());

        for _ in 0..3 {
            tracker.process_detection(ExerciseType::ArmRaise, 0.85);
        }
        hold(&mut tracker, ExerciseType::Standing, 3);
        assert_eq!(tracker.total_reps(), 0);

        hold(&mut tracker, ExerciseType::ArmRaise, 3);
        hold(&mut tracker, ExerciseType::Standing, 3);
        assert_eq!(tracker.total_reps(), 1);
    }

    #[test]
    fn elapsed_tracks_start_time() {
        let mut tracker = WorkoutTracker::default();
        assert_eq!(tracker.elapsed_secs(t0()), 0.0);
        tracker.start(t0());
        assert!((tracker.elapsed_secs(t0() + Duration::milliseconds(1500)) - 1.5).abs() < 1e-9);
    }
}
