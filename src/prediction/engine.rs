//! Game forecasting against current or historical ratings

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::prediction::accuracy::{accuracy_metrics, AccuracyReport};
use crate::rating::formulas;
use crate::storage::LeagueStore;
use crate::types::{Confidence, Game, Prediction, Season, Team, Week};
use crate::utils::{current_timestamp, round2, round3};

/// Projected-score baseline in points
const SCORE_BASELINE: f64 = 30.0;

/// Points of projected-score shift per 100 rating points of difference
const POINTS_PER_100_RATING: f64 = 3.5;

/// Projected scores are clamped to this range
const SCORE_FLOOR: f64 = 0.0;
const SCORE_CEILING: f64 = 150.0;

/// Confidence bucket thresholds, as probability distance from even
const HIGH_CONFIDENCE_MARGIN: f64 = 0.30;
const MEDIUM_CONFIDENCE_MARGIN: f64 = 0.15;

/// Outcome counts for a batch prediction backfill
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackfillSummary {
    pub predictions: Vec<Prediction>,
    pub succeeded: usize,
    pub failed: usize,
    /// Forecasts that fell back to the default rating for at least one side
    pub degraded: usize,
}

/// Forecasts unplayed games and grades the forecasts afterwards
///
/// The score projection is intentionally a simple linear heuristic anchored
/// at a 30-point baseline, not a separately fit scoring model; any
/// replacement must preserve the same input/output contract.
pub struct PredictionEngine {
    config: EngineConfig,
    store: Arc<dyn LeagueStore>,
}

impl PredictionEngine {
    /// Create a prediction engine with the given configuration
    pub fn new(config: EngineConfig, store: Arc<dyn LeagueStore>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, store })
    }

    /// Forecast an unplayed game from live team state
    ///
    /// Returns `None` rather than an error when either team fails
    /// validation (zero or negative rating, wrong team passed) or the game
    /// is already processed; newly added or malformed teams are expected,
    /// and callers filter these out silently.
    pub fn predict(&self, game: &Game, home: &Team, away: &Team) -> Option<Prediction> {
        if game.processed {
            debug!(game_id = %game.id, "game already processed, not predicting");
            return None;
        }
        if home.name != game.home_team || away.name != game.away_team {
            debug!(game_id = %game.id, "teams do not match game, not predicting");
            return None;
        }
        if home.rating <= 0.0 || away.rating <= 0.0 {
            warn!(
                home = %home.name,
                away = %away.name,
                "uninitialized rating, not predicting"
            );
            return None;
        }

        Some(self.forecast(game, home.rating, away.rating))
    }

    /// Forecast using ratings as they stood before `week`, not live state
    ///
    /// Reads each team's rating from the (season, week - 1) snapshot, with
    /// week-1 games served by the preseason week-0 snapshot, so a
    /// retrospective forecast never sees the game being predicted. A
    /// missing snapshot falls back to the configured default rating with a
    /// logged warning: a known degraded-accuracy path, not a failure.
    pub fn predict_with_historical_ratings(
        &self,
        game: &Game,
        season: Season,
        week: Week,
    ) -> Result<Prediction> {
        let (prediction, _degraded) = self.historical_forecast(game, season, week)?;
        Ok(prediction)
    }

    fn historical_forecast(
        &self,
        game: &Game,
        season: Season,
        week: Week,
    ) -> Result<(Prediction, bool)> {
        let snapshot_week = week.saturating_sub(1);
        let (home_rating, home_fallback) =
            self.historical_rating(&game.home_team, season, snapshot_week)?;
        let (away_rating, away_fallback) =
            self.historical_rating(&game.away_team, season, snapshot_week)?;

        let prediction = self.forecast(game, home_rating, away_rating);
        Ok((prediction, home_fallback || away_fallback))
    }

    fn historical_rating(&self, team: &str, season: Season, week: Week) -> Result<(f64, bool)> {
        match self.store.snapshot_rating(team, season, week)? {
            Some(rating) => Ok((rating, false)),
            None => {
                warn!(
                    team,
                    season,
                    week,
                    fallback = self.config.default_historical_rating,
                    "no ranking snapshot found, using default rating"
                );
                Ok((self.config.default_historical_rating, true))
            }
        }
    }

    fn forecast(&self, game: &Game, home_rating: f64, away_rating: f64) -> Prediction {
        let effective_home = if game.neutral_site {
            home_rating
        } else {
            home_rating + self.config.home_field_advantage
        };

        let home_probability = formulas::expected_score(effective_home, away_rating);
        let (predicted_winner, win_probability) = if home_probability >= 0.5 {
            (game.home_team.clone(), home_probability)
        } else {
            (game.away_team.clone(), 1.0 - home_probability)
        };

        let shift = (effective_home - away_rating) / 100.0 * POINTS_PER_100_RATING;
        let home_points = (SCORE_BASELINE + shift).clamp(SCORE_FLOOR, SCORE_CEILING);
        let away_points = (SCORE_BASELINE - shift).clamp(SCORE_FLOOR, SCORE_CEILING);

        let distance = (home_probability - 0.5).abs();
        let confidence = if distance > HIGH_CONFIDENCE_MARGIN {
            Confidence::High
        } else if distance > MEDIUM_CONFIDENCE_MARGIN {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        Prediction {
            game_id: game.id,
            season: game.season,
            week: game.week,
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            predicted_winner,
            predicted_home_score: home_points.round() as u32,
            predicted_away_score: away_points.round() as u32,
            win_probability: round3(win_probability),
            confidence,
            home_rating: round2(home_rating),
            away_rating: round2(away_rating),
            correct: None,
            created_at: current_timestamp(),
        }
    }

    /// Resolve a forecast against the real final score
    ///
    /// Sets the correctness flag only; probability and score fields are
    /// never revised after the fact. Equal scores resolve with the same tie
    /// policy the processor uses.
    pub fn score_prediction(&self, prediction: &mut Prediction, home_score: u32, away_score: u32) {
        let home_won = if home_score == away_score {
            self.config.award_ties_to_home
        } else {
            home_score > away_score
        };
        let actual_winner = if home_won {
            &prediction.home_team
        } else {
            &prediction.away_team
        };
        prediction.correct = Some(&prediction.predicted_winner == actual_winner);
    }

    /// Retrospective forecasts for a batch of games
    ///
    /// Per-item failures are logged, counted and skipped; the batch never
    /// aborts part-way. The summary reports successes, failures and
    /// degraded (default-rating fallback) forecasts.
    pub fn backfill_predictions(&self, games: &[Game], season: Season) -> BackfillSummary {
        let mut summary = BackfillSummary::default();

        for game in games {
            match self.historical_forecast(game, season, game.week) {
                Ok((prediction, degraded)) => {
                    summary.succeeded += 1;
                    if degraded {
                        summary.degraded += 1;
                    }
                    summary.predictions.push(prediction);
                }
                Err(error) => {
                    warn!(game_id = %game.id, %error, "skipping game in prediction backfill");
                    summary.failed += 1;
                }
            }
        }

        debug!(
            season,
            succeeded = summary.succeeded,
            failed = summary.failed,
            degraded = summary.degraded,
            "prediction backfill complete"
        );
        summary
    }

    /// Aggregate forecast quality over resolved predictions
    pub fn accuracy_metrics(&self, predictions: &[Prediction]) -> AccuracyReport {
        accuracy_metrics(predictions)
    }
}
