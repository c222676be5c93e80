//! Forecast accuracy metrics
//!
//! Four numbers are the system's model-quality signal: hit rate, Brier
//! score, log-loss and mean confidence. Nothing else is scored.

use serde::{Deserialize, Serialize};

use crate::types::Prediction;

/// Probabilities are clamped to this range for log-loss so a confidently
/// wrong forecast is penalized finitely
const PROBABILITY_FLOOR: f64 = 0.001;
const PROBABILITY_CEILING: f64 = 0.999;

/// Aggregate forecast quality over a set of resolved predictions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// Fraction of resolved predictions whose winner was right
    pub accuracy: f64,
    /// Mean squared error between probability and the 0/1 outcome
    pub brier_score: f64,
    /// Mean negative log-probability assigned to the actual outcome
    pub log_loss: f64,
    /// Mean absolute distance of the probability from 0.5
    pub mean_confidence: f64,
    /// Number of resolved predictions scored
    pub sample_count: usize,
}

/// Compute accuracy metrics over the resolved predictions in `predictions`
///
/// Unresolved predictions (no `correct` flag yet) are ignored. An empty
/// resolved sample yields a zeroed report.
pub fn accuracy_metrics(predictions: &[Prediction]) -> AccuracyReport {
    let resolved: Vec<(f64, bool)> = predictions
        .iter()
        .filter_map(|p| p.correct.map(|correct| (p.win_probability, correct)))
        .collect();

    if resolved.is_empty() {
        return AccuracyReport::default();
    }

    let count = resolved.len() as f64;
    let hits = resolved.iter().filter(|(_, correct)| *correct).count();

    let brier_score = resolved
        .iter()
        .map(|(probability, correct)| {
            let outcome = if *correct { 1.0 } else { 0.0 };
            (probability - outcome).powi(2)
        })
        .sum::<f64>()
        / count;

    let log_loss = resolved
        .iter()
        .map(|(probability, correct)| {
            let actual = if *correct {
                *probability
            } else {
                1.0 - probability
            };
            -actual.clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING).ln()
        })
        .sum::<f64>()
        / count;

    let mean_confidence = resolved
        .iter()
        .map(|(probability, _)| (probability - 0.5).abs())
        .sum::<f64>()
        / count;

    AccuracyReport {
        accuracy: hits as f64 / count,
        brier_score,
        log_loss,
        mean_confidence,
        sample_count: resolved.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, Prediction};
    use crate::utils::{current_timestamp, generate_game_id};

    fn resolved_prediction(probability: f64, correct: bool) -> Prediction {
        Prediction {
            game_id: generate_game_id(),
            season: 2025,
            week: 5,
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            predicted_winner: "Home".to_string(),
            predicted_home_score: 31,
            predicted_away_score: 24,
            win_probability: probability,
            confidence: Confidence::Medium,
            home_rating: 1600.0,
            away_rating: 1500.0,
            correct: Some(correct),
            created_at: current_timestamp(),
        }
    }

    #[test]
    fn test_empty_input_yields_zeroed_report() {
        let report = accuracy_metrics(&[]);
        assert_eq!(report, AccuracyReport::default());
        assert_eq!(report.sample_count, 0);
    }

    #[test]
    fn test_unresolved_predictions_are_ignored() {
        let mut unresolved = resolved_prediction(0.8, true);
        unresolved.correct = None;

        let report = accuracy_metrics(&[unresolved, resolved_prediction(0.7, true)]);
        assert_eq!(report.sample_count, 1);
        assert_eq!(report.accuracy, 1.0);
    }

    #[test]
    fn test_known_values() {
        let predictions = vec![
            resolved_prediction(0.75, true),
            resolved_prediction(0.60, false),
        ];

        let report = accuracy_metrics(&predictions);

        assert_eq!(report.sample_count, 2);
        assert!((report.accuracy - 0.5).abs() < 1e-9);
        // ((0.75 - 1)^2 + (0.60 - 0)^2) / 2
        assert!((report.brier_score - 0.21125).abs() < 1e-9);
        // (-ln 0.75 - ln 0.40) / 2
        assert!((report.log_loss - 0.601986).abs() < 1e-5);
        // (0.25 + 0.10) / 2
        assert!((report.mean_confidence - 0.175).abs() < 1e-9);
    }

    #[test]
    fn test_log_loss_is_clamped_for_certain_misses() {
        let report = accuracy_metrics(&[resolved_prediction(1.0, false)]);
        // -ln(0.001), not infinity
        assert!(report.log_loss.is_finite());
        assert!((report.log_loss - 6.907755).abs() < 1e-5);
    }

    #[test]
    fn test_perfect_forecasts_score_cleanly() {
        let predictions = vec![
            resolved_prediction(0.9, true),
            resolved_prediction(0.8, true),
        ];
        let report = accuracy_metrics(&predictions);

        assert_eq!(report.accuracy, 1.0);
        assert!(report.brier_score < 0.03);
        assert!(report.log_loss < 0.2);
    }
}
