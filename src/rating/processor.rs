//! Game processing against team rating state
//!
//! Applies one completed, eligible game to both participating teams,
//! atomically: every precondition is checked before any state is touched,
//! so a validation failure never leaves a half-updated team.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{RatingError, Result};
use crate::rating::formulas;
use crate::types::{Game, GameSummary, ProcessOutcome, Team};
use crate::utils::{round2, round3};

/// Applies completed games to team rating state
///
/// Callers must serialize invocations for games that share a team; the
/// rating update is a read-modify-write with no internal locking.
#[derive(Debug, Clone)]
pub struct GameProcessor {
    config: EngineConfig,
}

impl GameProcessor {
    /// Create a game processor with the given configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check every precondition without touching any state
    fn validate_game(&self, game: &Game, home: &Team, away: &Team) -> Result<()> {
        if game.excluded {
            return Err(RatingError::ExcludedGame {
                game_id: game.id.to_string(),
            }
            .into());
        }

        if !game.has_final_score() {
            return Err(RatingError::NoScoresAvailable {
                game_id: game.id.to_string(),
            }
            .into());
        }

        if home.name != game.home_team {
            return Err(RatingError::TeamMismatch {
                game_id: game.id.to_string(),
                expected: game.home_team.clone(),
                actual: home.name.clone(),
            }
            .into());
        }

        if away.name != game.away_team {
            return Err(RatingError::TeamMismatch {
                game_id: game.id.to_string(),
                expected: game.away_team.clone(),
                actual: away.name.clone(),
            }
            .into());
        }

        if game.week > self.config.max_week {
            return Err(RatingError::WeekOutOfRange {
                game_id: game.id.to_string(),
                week: game.week,
                max_week: self.config.max_week,
            }
            .into());
        }

        if game.season < self.config.min_season || game.season > self.config.max_season {
            return Err(RatingError::SeasonOutOfRange {
                game_id: game.id.to_string(),
                season: game.season,
                min_season: self.config.min_season,
                max_season: self.config.max_season,
            }
            .into());
        }

        if let Some(quarters) = &game.quarter_scores {
            if !quarters.matches_final(game.home_score, game.away_score) {
                return Err(RatingError::QuarterScoreMismatch {
                    game_id: game.id.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Apply one completed, eligible game to both teams
    ///
    /// Mutates exactly the two teams and the game passed in. An
    /// already-processed game returns the `AlreadyProcessed` sentinel with
    /// no mutation; any violated precondition returns a [`RatingError`]
    /// naming the game and the invariant, also with no mutation.
    pub fn process_game(
        &self,
        game: &mut Game,
        home: &mut Team,
        away: &mut Team,
    ) -> Result<ProcessOutcome> {
        if game.processed {
            debug!(game_id = %game.id, "game already processed, returning sentinel");
            return Ok(ProcessOutcome::AlreadyProcessed { game_id: game.id });
        }

        self.validate_game(game, home, away)?;

        // Equal scores do not occur for graded games; when encountered the
        // away side wins unless configured otherwise.
        let home_won = if game.home_score == game.away_score {
            self.config.award_ties_to_home
        } else {
            game.home_score > game.away_score
        };

        let effective_home_rating = if game.neutral_site {
            home.rating
        } else {
            home.rating + self.config.home_field_advantage
        };

        let (winner_rating, loser_rating) = if home_won {
            (effective_home_rating, away.rating)
        } else {
            (away.rating, effective_home_rating)
        };

        let winner_expected = formulas::expected_score(winner_rating, loser_rating);
        let loser_expected = 1.0 - winner_expected;

        let differential = (game.home_score as i64 - game.away_score as i64).abs();
        let mov = formulas::mov_multiplier(differential, self.config.mov_cap);

        let (winner_tier, loser_tier) = if home_won {
            (home.tier, away.tier)
        } else {
            (away.tier, home.tier)
        };
        let (winner_factor, loser_factor) = formulas::conference_multiplier(winner_tier, loser_tier);

        let k = self.config.k_factor.k_for_week(game.week);
        let winner_delta = k * (1.0 - winner_expected) * mov * winner_factor;
        let loser_delta = k * (0.0 - loser_expected) * mov * loser_factor;

        let (home_delta, away_delta) = if home_won {
            (winner_delta, loser_delta)
        } else {
            (loser_delta, winner_delta)
        };

        home.rating += home_delta;
        away.rating += away_delta;
        if home_won {
            home.wins += 1;
            away.losses += 1;
        } else {
            away.wins += 1;
            home.losses += 1;
        }

        game.home_delta = Some(home_delta);
        game.away_delta = Some(away_delta);
        game.processed = true;

        let (winner, loser, score) = if home_won {
            (
                home.name.clone(),
                away.name.clone(),
                format!("{}-{}", game.home_score, game.away_score),
            )
        } else {
            (
                away.name.clone(),
                home.name.clone(),
                format!("{}-{}", game.away_score, game.home_score),
            )
        };

        Ok(ProcessOutcome::Processed(GameSummary {
            game_id: game.id,
            winner,
            loser,
            score,
            home_delta: round2(home_delta),
            away_delta: round2(away_delta),
            home_rating: round2(home.rating),
            away_rating: round2(away.rating),
            win_probability: round3(winner_expected),
            mov_multiplier: round2(mov),
        }))
    }
}
