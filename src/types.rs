//! Common types used throughout the rating engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rating::formulas;

/// Unique identifier for teams (the program name)
pub type TeamId = String;

/// Unique identifier for games
pub type GameId = Uuid;

/// Season year
pub type Season = u16;

/// Week number within a season
pub type Week = u8;

/// Sentinel recruiting/transfer rank meaning "unranked"
pub const UNRANKED: u32 = 999;

/// Competitive tier of a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Power,
    GroupOfFive,
    Fcs,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Power => write!(f, "Power"),
            Tier::GroupOfFive => write!(f, "G5"),
            Tier::Fcs => write!(f, "FCS"),
        }
    }
}

/// One program's rating state for the current season
///
/// `initial_rating` is frozen at creation (or at a season reset) and never
/// mutated afterwards; `rating` is only ever changed by the game processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: TeamId,
    pub tier: Tier,
    /// National recruiting rank, larger = worse, 999 = unranked
    pub recruiting_rank: u32,
    /// Transfer-portal class rank, same convention as recruiting
    pub transfer_rank: u32,
    /// Fraction of last season's production returning, 0.0-1.0
    pub returning_production: f64,
    pub rating: f64,
    pub initial_rating: f64,
    pub wins: u32,
    pub losses: u32,
}

impl Team {
    /// Create a team with its rating seeded from the preseason composite
    pub fn new(
        name: impl Into<TeamId>,
        tier: Tier,
        recruiting_rank: u32,
        transfer_rank: u32,
        returning_production: f64,
    ) -> Self {
        let rating =
            formulas::preseason_composite(tier, recruiting_rank, transfer_rank, returning_production);
        Self {
            name: name.into(),
            tier,
            recruiting_rank,
            transfer_rank,
            returning_production,
            rating,
            initial_rating: rating,
            wins: 0,
            losses: 0,
        }
    }

    /// Reinitialize rating state from the preseason inputs, keeping identity
    pub fn reset_preseason(&mut self) {
        let rating = formulas::preseason_composite(
            self.tier,
            self.recruiting_rank,
            self.transfer_rank,
            self.returning_production,
        );
        self.rating = rating;
        self.initial_rating = rating;
        self.wins = 0;
        self.losses = 0;
    }

    /// Win-loss record as "W-L"
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

/// Per-quarter scoring breakdown
///
/// All-or-nothing alongside the final score: either all eight values are
/// present and reconcile with the final, or the field is absent entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScores {
    pub home: [u32; 4],
    pub away: [u32; 4],
}

impl QuarterScores {
    /// Whether the quarter totals reconcile with the given final score
    pub fn matches_final(&self, home_score: u32, away_score: u32) -> bool {
        self.home.iter().sum::<u32>() == home_score && self.away.iter().sum::<u32>() == away_score
    }
}

/// One scheduled or completed matchup between two teams
///
/// Holds team references by id only; a 0-0 score means "not yet played".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub week: Week,
    pub season: Season,
    pub neutral_site: bool,
    pub quarter_scores: Option<QuarterScores>,
    /// Transitions false -> true exactly once, at processing time
    pub processed: bool,
    /// Games that must never affect ratings (e.g. out-of-scope opponents)
    pub excluded: bool,
    /// Rating delta applied to the home side, recorded at processing time
    pub home_delta: Option<f64>,
    /// Rating delta applied to the away side, recorded at processing time
    pub away_delta: Option<f64>,
}

impl Game {
    /// Create a scheduled game with a placeholder 0-0 score
    pub fn scheduled(
        home_team: impl Into<TeamId>,
        away_team: impl Into<TeamId>,
        week: Week,
        season: Season,
    ) -> Self {
        Self {
            id: crate::utils::generate_game_id(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score: 0,
            away_score: 0,
            week,
            season,
            neutral_site: false,
            quarter_scores: None,
            processed: false,
            excluded: false,
            home_delta: None,
            away_delta: None,
        }
    }

    /// Whether a real result has been recorded
    pub fn has_final_score(&self) -> bool {
        self.home_score != 0 || self.away_score != 0
    }

    /// Record the final score of a completed game
    pub fn with_result(mut self, home_score: u32, away_score: u32) -> Self {
        self.home_score = home_score;
        self.away_score = away_score;
        self
    }
}

/// One row of a computed standings snapshot
///
/// Derived fresh from team and game state on every request; persistence of
/// historical snapshots belongs to the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position in the rating ordering
    pub rank: u32,
    pub team: TeamId,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
    /// Average current rating of eligible opponents
    pub sos: f64,
    /// 1-based position in the SOS ordering, computed over the full pool
    pub sos_rank: u32,
}

/// Forecast confidence bucket, by distance of the win probability from even
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// Forecast for one unplayed game
///
/// The two team ratings are frozen at forecast time for later audit;
/// `correct` starts unset and is resolved once the real game completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub game_id: GameId,
    pub season: Season,
    pub week: Week,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub predicted_winner: TeamId,
    pub predicted_home_score: u32,
    pub predicted_away_score: u32,
    /// Win probability of the predicted winner, rounded to 3 decimals
    pub win_probability: f64,
    pub confidence: Confidence,
    /// Home rating at the moment of forecast
    pub home_rating: f64,
    /// Away rating at the moment of forecast
    pub away_rating: f64,
    pub correct: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Audit record returned after processing one game
///
/// Ratings and deltas are rounded to 2 decimals, the probability to 3, for
/// display and audit consistency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub winner: TeamId,
    pub loser: TeamId,
    /// Final score as "W-L", winner first
    pub score: String,
    pub home_delta: f64,
    pub away_delta: f64,
    pub home_rating: f64,
    pub away_rating: f64,
    /// Expected-win probability of the winner, from pre-game ratings
    pub win_probability: f64,
    pub mov_multiplier: f64,
}

/// Result of a processing attempt
///
/// `AlreadyProcessed` is a sentinel, not an error: reprocessing attempts stay
/// observable without throwing, so orchestration can treat them idempotently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProcessOutcome {
    Processed(GameSummary),
    AlreadyProcessed { game_id: GameId },
}

impl ProcessOutcome {
    /// The computed summary, if this outcome carried one
    pub fn summary(&self) -> Option<&GameSummary> {
        match self {
            ProcessOutcome::Processed(summary) => Some(summary),
            ProcessOutcome::AlreadyProcessed { .. } => None,
        }
    }
}
