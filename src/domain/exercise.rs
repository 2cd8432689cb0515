// SPDX-License-Identifier: MPL-2.0
//! Exercise types and finished workout sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ExerciseType
// =============================================================================

/// Pose recognized in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExerciseType {
    ArmRaise,
    Standing,
    Lunge,
    /// No recognizable pose.
    Unknown,
}

impl ExerciseType {
    /// Exercises that can carry a rep count.
    pub const COUNTED: [ExerciseType; 3] = [
        ExerciseType::ArmRaise,
        ExerciseType::Standing,
        ExerciseType::Lunge,
    ];

    /// Maps a model output label to an exercise.
    ///
    /// Matching is case-insensitive and accepts both `arm_raise` and the
    /// display form `Arm Raise`. Unrecognized labels return `None`.
    #[must_use]
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "arm_raise" | "arm raise" => Some(ExerciseType::ArmRaise),
            "lunge" => Some(ExerciseType::Lunge),
            "standing" => Some(ExerciseType::Standing),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            ExerciseType::ArmRaise => "Arm Raise",
            ExerciseType::Standing => "Standing",
            ExerciseType::Lunge => "Lunge",
            ExerciseType::Unknown => "Unknown",
        }
    }

    /// Returns `true` for poses that count as an active movement.
    #[must_use]
    pub const fn is_movement(self) -> bool {
        matches!(self, ExerciseType::ArmRaise | ExerciseType::Lunge)
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// =============================================================================
// WorkoutSession
// =============================================================================

/// Number of reps performed for one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCount {
    pub exercise: ExerciseType,
    pub count: u32,
}

/// A finished workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Identifier derived from the start time.
    pub id: String,
    /// When the workout started.
    pub date: DateTime<Utc>,
    /// Length of the workout in seconds.
    pub duration_secs: f64,
    pub exercises: Vec<ExerciseCount>,
}

impl WorkoutSession {
    #[must_use]
    pub fn new(date: DateTime<Utc>, duration_secs: f64, exercises: Vec<ExerciseCount>) -> Self {
        Self {
            id: date.format("%Y%m%dT%H%M%S%.3fZ").to_string(),
            date,
            duration_secs,
            exercises,
        }
    }

    /// Sum of reps across all exercises.
    #[must_use]
    pub fn total_reps(&self) -> u32 {
        self.exercises.iter().map(|e| e.count).sum()
    }

    /// Reps recorded for `exercise`, zero when absent.
    #[must_use]
    pub fn reps_for(&self, exercise: ExerciseType) -> u32 {
        self.exercises
            .iter()
            .find(|e| e.exercise == exercise)
            .map_or(0, |e| e.count)
    }

    /// Duration formatted as `"{m}m {s}s"`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn formatted_duration(&self) -> String {
        let total = self.duration_secs.max(0.0) as u64;
        format!("{}m {}s", total / 60, total % 60)
    }
}
