//! Standings and strength-of-schedule computation

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::storage::{LeagueStore, SnapshotRecord};
use crate::types::{RankingEntry, Season, Week};
use crate::utils::{current_timestamp, round2};

/// Computes ordered standings and per-team strength of schedule
///
/// Holds an explicit store handle; constructed per season-processing run and
/// discarded after. Every operation here is a side-effect-free read except
/// [`RankingEngine::save_weekly_snapshot`] and [`RankingEngine::reset_season`].
pub struct RankingEngine {
    store: Arc<dyn LeagueStore>,
}

impl RankingEngine {
    pub fn new(store: Arc<dyn LeagueStore>) -> Self {
        Self { store }
    }

    /// Average current rating of all opponents faced in eligible games
    ///
    /// Eligible means processed and not excluded. Opponent ratings are read
    /// at computation time, not from a historical snapshot: SOS reflects how
    /// good the opposition is as best known now, so it keeps moving as past
    /// opponents keep playing. Returns 0.0 for a team with no eligible games.
    pub fn calculate_sos(&self, team: &str, season: Season) -> Result<f64> {
        let games = self.store.games_for_team(team, season)?;

        let mut total = 0.0;
        let mut count = 0usize;
        for game in games.iter().filter(|g| g.processed && !g.excluded) {
            let opponent = if game.home_team == team {
                &game.away_team
            } else {
                &game.home_team
            };
            match self.store.get_team(opponent)? {
                Some(opp) => {
                    total += opp.rating;
                    count += 1;
                }
                None => {
                    warn!(team = %opponent, "opponent missing from store, skipped for SOS");
                }
            }
        }

        if count == 0 {
            return Ok(0.0);
        }
        Ok(total / count as f64)
    }

    /// Ordered standings for a season
    ///
    /// Teams are sorted strictly descending by current rating; the sort is
    /// stable, so equal ratings keep the store's insertion order rather than
    /// being re-sorted by a secondary key. SOS ranks are assigned over the
    /// full pool before `limit` truncates the list.
    pub fn current_rankings(
        &self,
        season: Season,
        limit: Option<usize>,
    ) -> Result<Vec<RankingEntry>> {
        let mut teams = self.store.all_teams()?;
        teams.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
        });

        let mut entries = Vec::with_capacity(teams.len());
        for (position, team) in teams.iter().enumerate() {
            let sos = self.calculate_sos(&team.name, season)?;
            entries.push(RankingEntry {
                rank: (position + 1) as u32,
                team: team.name.clone(),
                rating: round2(team.rating),
                wins: team.wins,
                losses: team.losses,
                sos: round2(sos),
                sos_rank: 0,
            });
        }

        let mut by_sos: Vec<usize> = (0..entries.len()).collect();
        by_sos.sort_by(|&a, &b| {
            entries[b]
                .sos
                .partial_cmp(&entries[a].sos)
                .unwrap_or(Ordering::Equal)
        });
        for (position, index) in by_sos.into_iter().enumerate() {
            entries[index].sos_rank = (position + 1) as u32;
        }

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    /// Persist the current standings for (season, week)
    ///
    /// A pure write-through of [`RankingEngine::current_rankings`]; no
    /// additional computation happens here.
    pub fn save_weekly_snapshot(&self, season: Season, week: Week) -> Result<()> {
        let entries = self.current_rankings(season, None)?;
        info!(season, week, teams = entries.len(), "saving weekly ranking snapshot");
        self.store.store_snapshot(SnapshotRecord {
            season,
            week,
            entries,
            created_at: current_timestamp(),
        })
    }

    /// Reinitialize every team's rating state for a new season
    ///
    /// Ratings return to the preseason composite and records zero out.
    /// Irreversible without an external backup.
    pub fn reset_season(&self, season: Season) -> Result<()> {
        let teams = self.store.all_teams()?;
        info!(season, teams = teams.len(), "resetting season rating state");
        for mut team in teams {
            team.reset_preseason();
            self.store.upsert_team(team)?;
        }
        Ok(())
    }
}
