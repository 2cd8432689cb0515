// SPDX-License-Identifier: MPL-2.0
//! Reduces a classification to the single exercise shown in the frame.

use crate::domain::classification::ClassificationResult;
use crate::domain::exercise::ExerciseType;

/// Below this confidence, a frame without a recognized pose counts as rest.
pub const NEUTRAL_FALLBACK_CONFIDENCE: f32 = 0.5;

/// The exercise detected in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub exercise: ExerciseType,
    pub confidence: f32,
}

impl Detection {
    /// Picks the highest-scoring label that maps to an [`ExerciseType`].
    ///
    /// Labels the model knows but that do not map to an exercise are skipped.
    /// When nothing maps (or every mapped score is zero) the frame is treated
    /// as the neutral `Standing` pose with zero confidence.
    #[must_use]
    pub fn from_result(result: &ClassificationResult) -> Self {
        let mut best = Detection {
            exercise: ExerciseType::Unknown,
            confidence: 0.0,
        };

        for (label, score) in result.ranked() {
            if score > best.confidence {
                if let Some(exercise) = ExerciseType::from_model_label(label) {
                    best = Detection {
                        exercise,
                        confidence: score,
                    };
                }
            }
        }

        if best.exercise == ExerciseType::Unknown && best.confidence < NEUTRAL_FALLBACK_CONFIDENCE
        {
            best.exercise = ExerciseType::Standing;
        }
        best
    }
}
