//! League state storage interface and implementations
//!
//! This module defines the repository object handed into every engine call,
//! with an in-memory implementation and a recording test double. The engine
//! itself performs no I/O; a database-backed implementation of the same
//! trait belongs to the orchestration layer.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RatingError, Result};
use crate::types::{Game, GameId, RankingEntry, Season, Team, Week};

/// One persisted weekly ranking snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub season: Season,
    pub week: Week,
    pub entries: Vec<RankingEntry>,
    pub created_at: DateTime<Utc>,
}

/// Trait for league state storage operations
///
/// The single-writer assumption from the engine applies here too: rating
/// mutations go through one caller at a time, reads may be shared.
pub trait LeagueStore: Send + Sync {
    /// Get a team by name
    fn get_team(&self, name: &str) -> Result<Option<Team>>;

    /// Store or replace a team
    fn upsert_team(&self, team: Team) -> Result<()>;

    /// All teams in insertion order
    ///
    /// Ranking tie-breaks depend on this order being stable.
    fn all_teams(&self) -> Result<Vec<Team>>;

    /// Total number of teams
    fn team_count(&self) -> Result<usize>;

    /// Get a game by id
    fn get_game(&self, id: GameId) -> Result<Option<Game>>;

    /// Store or replace a game
    fn upsert_game(&self, game: Game) -> Result<()>;

    /// Games involving `team` in `season`, in insertion order
    fn games_for_team(&self, team: &str, season: Season) -> Result<Vec<Game>>;

    /// All games in `season`, in insertion order
    fn games_for_season(&self, season: Season) -> Result<Vec<Game>>;

    /// Persist one weekly ranking snapshot
    fn store_snapshot(&self, snapshot: SnapshotRecord) -> Result<()>;

    /// Rating recorded for `team` in the (season, week) snapshot
    fn snapshot_rating(&self, team: &str, season: Season, week: Week) -> Result<Option<f64>>;
}

/// In-memory league storage implementation
///
/// Teams and games are kept in insertion order; lookups are linear scans,
/// which is plenty for a league of ~130 programs and a season of games.
#[derive(Debug, Default)]
pub struct InMemoryLeagueStore {
    teams: RwLock<Vec<Team>>,
    games: RwLock<Vec<Game>>,
    snapshots: RwLock<HashMap<(Season, Week), SnapshotRecord>>,
}

impl InMemoryLeagueStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(what: &str) -> RatingError {
    RatingError::StorageError {
        message: format!("Failed to acquire {} lock", what),
    }
}

impl LeagueStore for InMemoryLeagueStore {
    fn get_team(&self, name: &str) -> Result<Option<Team>> {
        let teams = self.teams.read().map_err(|_| lock_error("teams read"))?;
        Ok(teams.iter().find(|t| t.name == name).cloned())
    }

    fn upsert_team(&self, team: Team) -> Result<()> {
        let mut teams = self.teams.write().map_err(|_| lock_error("teams write"))?;
        match teams.iter_mut().find(|t| t.name == team.name) {
            Some(existing) => *existing = team,
            None => teams.push(team),
        }
        Ok(())
    }

    fn all_teams(&self) -> Result<Vec<Team>> {
        let teams = self.teams.read().map_err(|_| lock_error("teams read"))?;
        Ok(teams.clone())
    }

    fn team_count(&self) -> Result<usize> {
        let teams = self.teams.read().map_err(|_| lock_error("teams read"))?;
        Ok(teams.len())
    }

    fn get_game(&self, id: GameId) -> Result<Option<Game>> {
        let games = self.games.read().map_err(|_| lock_error("games read"))?;
        Ok(games.iter().find(|g| g.id == id).cloned())
    }

    fn upsert_game(&self, game: Game) -> Result<()> {
        let mut games = self.games.write().map_err(|_| lock_error("games write"))?;
        match games.iter_mut().find(|g| g.id == game.id) {
            Some(existing) => *existing = game,
            None => games.push(game),
        }
        Ok(())
    }

    fn games_for_team(&self, team: &str, season: Season) -> Result<Vec<Game>> {
        let games = self.games.read().map_err(|_| lock_error("games read"))?;
        Ok(games
            .iter()
            .filter(|g| g.season == season && (g.home_team == team || g.away_team == team))
            .cloned()
            .collect())
    }

    fn games_for_season(&self, season: Season) -> Result<Vec<Game>> {
        let games = self.games.read().map_err(|_| lock_error("games read"))?;
        Ok(games.iter().filter(|g| g.season == season).cloned().collect())
    }

    fn store_snapshot(&self, snapshot: SnapshotRecord) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| lock_error("snapshots write"))?;
        snapshots.insert((snapshot.season, snapshot.week), snapshot);
        Ok(())
    }

    fn snapshot_rating(&self, team: &str, season: Season, week: Week) -> Result<Option<f64>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| lock_error("snapshots read"))?;
        Ok(snapshots.get(&(season, week)).and_then(|snapshot| {
            snapshot
                .entries
                .iter()
                .find(|entry| entry.team == team)
                .map(|entry| entry.rating)
        }))
    }
}

/// League store test double that records snapshot writes
#[derive(Debug, Default)]
pub struct RecordingLeagueStore {
    inner: InMemoryLeagueStore,
    snapshot_calls: RwLock<Vec<(Season, Week)>>,
}

impl RecordingLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshot writes made, in order
    pub fn snapshot_calls(&self) -> Vec<(Season, Week)> {
        self.snapshot_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl LeagueStore for RecordingLeagueStore {
    fn get_team(&self, name: &str) -> Result<Option<Team>> {
        self.inner.get_team(name)
    }

    fn upsert_team(&self, team: Team) -> Result<()> {
        self.inner.upsert_team(team)
    }

    fn all_teams(&self) -> Result<Vec<Team>> {
        self.inner.all_teams()
    }

    fn team_count(&self) -> Result<usize> {
        self.inner.team_count()
    }

    fn get_game(&self, id: GameId) -> Result<Option<Game>> {
        self.inner.get_game(id)
    }

    fn upsert_game(&self, game: Game) -> Result<()> {
        self.inner.upsert_game(game)
    }

    fn games_for_team(&self, team: &str, season: Season) -> Result<Vec<Game>> {
        self.inner.games_for_team(team, season)
    }

    fn games_for_season(&self, season: Season) -> Result<Vec<Game>> {
        self.inner.games_for_season(season)
    }

    fn store_snapshot(&self, snapshot: SnapshotRecord) -> Result<()> {
        if let Ok(mut calls) = self.snapshot_calls.write() {
            calls.push((snapshot.season, snapshot.week));
        }
        self.inner.store_snapshot(snapshot)
    }

    fn snapshot_rating(&self, team: &str, season: Season, week: Week) -> Result<Option<f64>> {
        self.inner.snapshot_rating(team, season, week)
    }
}
