// SPDX-License-Identifier: MPL-2.0
//! Classification results and model input dimensions.

use std::collections::HashMap;

// =============================================================================
// ClassificationResult
// =============================================================================

/// Mapping from model label to confidence score.
///
/// Iteration order carries no meaning. Scores are conventionally in `[0, 1]`
/// but are not guaranteed to sum to one unless the model normalizes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationResult {
    scores: HashMap<String, f32>,
}

impl ClassificationResult {
    /// Builds a result by pairing labels with scores in order.
    ///
    /// Returns `None` if the two sequences differ in length.
    #[must_use]
    pub fn from_scores<S: AsRef<str>>(labels: &[S], scores: &[f32]) -> Option<Self> {
        if labels.len() != scores.len() {
            return None;
        }
        let scores = labels
            .iter()
            .zip(scores)
            .map(|(label, score)| (label.as_ref().to_string(), *score))
            .collect();
        Some(Self { scores })
    }

    /// Score for `label`, if the model knows it.
    #[must_use]
    pub fn score(&self, label: &str) -> Option<f32> {
        self.scores.get(label).copied()
    }

    /// Label with the highest score. Ties resolve to the lexicographically
    /// smaller label so the answer does not depend on hash order.
    #[must_use]
    pub fn top(&self) -> Option<(&str, f32)> {
        self.scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(label, score)| (label.as_str(), *score))
    }

    /// Iterates over `(label, score)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.scores.iter().map(|(label, score)| (label.as_str(), *score))
    }

    /// Pairs sorted by descending score, for display.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, f32)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        pairs
    }

    /// Returns `true` if the key set equals `labels` exactly.
    #[must_use]
    pub fn covers<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        self.scores.len() == labels.len()
            && labels.iter().all(|l| self.scores.contains_key(l.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

// =============================================================================
// ModelDimensions
// =============================================================================

/// Input width and height expected by a loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDimensions {
    width: u32,
    height: u32,
}

impl ModelDimensions {
    /// Creates dimensions, rejecting zero sizes.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Creates dimensions, raising zero sizes to one.
    #[must_use]
    pub const fn at_least_one(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    #[must_use]
    pub fn width(self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> u32 {
        self.height
    }

    /// Number of pixels in one input frame.
    #[must_use]
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 3] = ["arm_raise", "lunge", "standing"];

    #[test]
    fn from_scores_pairs_in_order() {
        let result = ClassificationResult::from_scores(&LABELS, &[0.1, 0.2, 0.7]).unwrap();
        assert_eq!(result.score("lunge"), Some(0.2));
        assert_eq!(result.score("squat"), None);
        assert!(result.covers(&LABELS));
    }

    #[test]
    fn from_scores_rejects_length_mismatch() {
        assert!(ClassificationResult::from_scores(&LABELS, &[0.5, 0.5]).is_none());
    }

    #[test]
    fn top_picks_highest_score() {
        let result = ClassificationResult::from_scores(&LABELS, &[0.85, 0.05, 0.10]).unwrap();
        assert_eq!(result.top(), Some(("arm_raise", 0.85)));
    }

    #[test]
    fn top_breaks_ties_by_label() {
        let result = ClassificationResult::from_scores(&LABELS, &[0.4, 0.4, 0.2]).unwrap();
        assert_eq!(result.top().map(|(l, _)| l), Some("arm_raise"));
    }

    #[test]
    fn ranked_is_descending() {
        let result = ClassificationResult::from_scores(&LABELS, &[0.2, 0.5, 0.3]).unwrap();
        let labels: Vec<_> = result.ranked().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["lunge", "standing", "arm_raise"]);
    }

    #[test]
    fn covers_requires_exact_key_set() {
        let result = ClassificationResult::from_scores(&["a", "b"], &[0.5, 0.5]).unwrap();
        assert!(!result.covers(&["a", "b", "c"]));
        assert!(!result.covers(&["a", "c"]));
        assert!(ClassificationResult::default().is_empty());
    }

    #[test]
    fn model_dimensions_reject_zero() {
        assert!(ModelDimensions::new(0, 96).is_none());
        let dims = ModelDimensions::new(96, 96).unwrap();
        assert_eq!(dims.pixel_count(), 9216);
    }
}
