//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating-engine scenarios
///
/// Every validation variant carries the identity of the offending entity so
/// callers can report exactly which invariant was violated. Reprocessing an
/// already-processed game is deliberately NOT an error; see
/// [`crate::types::ProcessOutcome::AlreadyProcessed`].
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("game {game_id}: no scores available")]
    NoScoresAvailable { game_id: String },

    #[error("game {game_id}: excluded from rankings and cannot change ratings")]
    ExcludedGame { game_id: String },

    #[error("game {game_id}: expected team {expected}, got {actual}")]
    TeamMismatch {
        game_id: String,
        expected: String,
        actual: String,
    },

    #[error("game {game_id}: week {week} is outside the accepted range 0-{max_week}")]
    WeekOutOfRange {
        game_id: String,
        week: u8,
        max_week: u8,
    },

    #[error("game {game_id}: season {season} is outside the accepted range {min_season}-{max_season}")]
    SeasonOutOfRange {
        game_id: String,
        season: u16,
        min_season: u16,
        max_season: u16,
    },

    #[error("game {game_id}: quarter scores do not add up to the final score")]
    QuarterScoreMismatch { game_id: String },

    #[error("team not found: {team}")]
    TeamNotFound { team: String },

    #[error("configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("internal storage error: {message}")]
    StorageError { message: String },
}
