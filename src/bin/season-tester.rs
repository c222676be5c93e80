//! Season Tester CLI Tool
//!
//! Command-line tool for exercising the rating engine against a synthetic,
//! fully deterministic season. Useful for eyeballing rating behavior and
//! forecast calibration without a data provider.
//!
//! Usage:
//!   cargo run --bin season-tester -- run-season --weeks 7
//!   cargo run --bin season-tester -- standings --limit 5
//!   cargo run --bin season-tester -- accuracy

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gridiron_rating::config::EngineConfig;
use gridiron_rating::error::RatingError;
use gridiron_rating::prediction::PredictionEngine;
use gridiron_rating::ranking::RankingEngine;
use gridiron_rating::rating::GameProcessor;
use gridiron_rating::storage::{InMemoryLeagueStore, LeagueStore};
use gridiron_rating::types::{Game, ProcessOutcome, Season, Team, Tier, Week, UNRANKED};

#[derive(Parser)]
#[command(name = "season-tester")]
#[command(about = "Replay a deterministic synthetic season through the rating engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Season year to simulate
    #[arg(long, default_value = "2025")]
    season: Season,

    /// Number of weeks to play
    #[arg(long, default_value = "7")]
    weeks: Week,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the season, printing each processed game
    RunSeason,
    /// Replay the season quietly and print final standings
    Standings {
        /// Truncate the standings to the top N teams
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Replay the season, backfill retrospective predictions and report accuracy
    Accuracy,
}

/// Fixed synthetic league; preseason inputs span every composite bucket
fn league() -> Vec<Team> {
    vec![
        Team::new("Crimson Tech", Tier::Power, 4, 8, 0.65),
        Team::new("Golden Valley", Tier::Power, 12, 20, 0.75),
        Team::new("Ironwood State", Tier::Power, 30, 45, 0.85),
        Team::new("Redstone A&M", Tier::Power, 60, UNRANKED, 0.55),
        Team::new("Bayou Central", Tier::GroupOfFive, 80, UNRANKED, 0.70),
        Team::new("High Plains", Tier::GroupOfFive, UNRANKED, UNRANKED, 0.45),
        Team::new("Lakeshore Tech", Tier::GroupOfFive, UNRANKED, 60, 0.35),
        Team::new("Pinecrest State", Tier::Fcs, UNRANKED, UNRANKED, 0.60),
    ]
}

/// Circle-method round robin pairings for the given week
fn week_pairings(team_count: usize, week: Week) -> Vec<(usize, usize)> {
    let rounds = team_count - 1;
    let round = (week as usize + rounds - 1) % rounds;

    let mut rotation: Vec<usize> = (1..team_count).collect();
    rotation.rotate_right(round);

    let mut pairings = vec![(0, rotation[0])];
    for slot in 1..team_count / 2 {
        pairings.push((rotation[slot], rotation[team_count - 1 - slot]));
    }

    // Alternate venues so nobody hosts every week
    if week % 2 == 0 {
        pairings = pairings.into_iter().map(|(a, b)| (b, a)).collect();
    }
    pairings
}

/// Deterministic final score from current ratings plus a fixed swing
fn synthetic_score(home_rating: f64, away_rating: f64, week: Week, slot: usize) -> (u32, u32) {
    let swing = ((week as i64 * 7 + slot as i64 * 13) % 11 - 5) as f64;
    let margin = ((home_rating - away_rating) / 25.0 + swing)
        .round()
        .clamp(-42.0, 42.0) as i64;

    let half = margin / 2;
    let home = (27 + half).clamp(3, 75) as u32;
    let away = (27 + half - margin).clamp(3, 75) as u32;
    (home, away)
}

/// Replay `weeks` of play, saving a ranking snapshot after every week
fn replay_season(
    store: &Arc<InMemoryLeagueStore>,
    season: Season,
    weeks: Week,
    verbose: bool,
) -> Result<()> {
    for team in league() {
        store.upsert_team(team)?;
    }

    let processor = GameProcessor::new(EngineConfig::default())?;
    let ranking = RankingEngine::new(store.clone() as Arc<dyn LeagueStore>);

    // Preseason snapshot backs week-1 retrospective forecasts
    ranking.save_weekly_snapshot(season, 0)?;

    let names: Vec<String> = store.all_teams()?.into_iter().map(|t| t.name).collect();

    for week in 1..=weeks {
        for (slot, (home_idx, away_idx)) in week_pairings(names.len(), week).into_iter().enumerate()
        {
            let mut home = store
                .get_team(&names[home_idx])?
                .ok_or_else(|| RatingError::TeamNotFound {
                    team: names[home_idx].clone(),
                })?;
            let mut away = store
                .get_team(&names[away_idx])?
                .ok_or_else(|| RatingError::TeamNotFound {
                    team: names[away_idx].clone(),
                })?;

            let (home_score, away_score) =
                synthetic_score(home.rating, away.rating, week, slot);
            let mut game = Game::scheduled(home.name.clone(), away.name.clone(), week, season)
                .with_result(home_score, away_score);

            let outcome = processor.process_game(&mut game, &mut home, &mut away)?;
            if verbose {
                if let ProcessOutcome::Processed(summary) = &outcome {
                    println!(
                        "  week {:>2}: {} beat {} {} ({:.1}% expected, mov x{:.2})",
                        week,
                        summary.winner,
                        summary.loser,
                        summary.score,
                        summary.win_probability * 100.0,
                        summary.mov_multiplier,
                    );
                }
            }

            store.upsert_team(home)?;
            store.upsert_team(away)?;
            store.upsert_game(game)?;
        }
        ranking.save_weekly_snapshot(season, week)?;
    }

    Ok(())
}

fn print_standings(store: &Arc<InMemoryLeagueStore>, season: Season, limit: Option<usize>) -> Result<()> {
    let ranking = RankingEngine::new(store.clone() as Arc<dyn LeagueStore>);
    let entries = ranking.current_rankings(season, limit)?;

    println!(
        "{:>4} {:>8} {:<18} {:>5} {:>9} {:>4}",
        "Rank", "Rating", "Team", "W-L", "SOS", "SoSR"
    );
    println!("{}", "-".repeat(54));
    for entry in entries {
        println!(
            "{:>4} {:>8.2} {:<18} {:>2}-{:<2} {:>9.2} {:>4}",
            entry.rank, entry.rating, entry.team, entry.wins, entry.losses, entry.sos, entry.sos_rank
        );
    }
    Ok(())
}

fn report_accuracy(store: &Arc<InMemoryLeagueStore>, season: Season) -> Result<()> {
    let prediction_engine = PredictionEngine::new(
        EngineConfig::backfill(),
        store.clone() as Arc<dyn LeagueStore>,
    )?;

    let games = store.games_for_season(season)?;
    let mut summary = prediction_engine.backfill_predictions(&games, season);

    for prediction in summary.predictions.iter_mut() {
        if let Some(game) = store.get_game(prediction.game_id)? {
            prediction_engine.score_prediction(prediction, game.home_score, game.away_score);
        }
    }

    let report = prediction_engine.accuracy_metrics(&summary.predictions);
    println!(
        "backfill: {} ok, {} failed, {} degraded",
        summary.succeeded, summary.failed, summary.degraded
    );
    println!("accuracy:        {:.3}", report.accuracy);
    println!("brier score:     {:.4}", report.brier_score);
    println!("log loss:        {:.4}", report.log_loss);
    println!("mean confidence: {:.3}", report.mean_confidence);
    println!("sample count:    {}", report.sample_count);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let store = Arc::new(InMemoryLeagueStore::new());

    match cli.command {
        Commands::RunSeason => {
            println!("replaying {} weeks of season {}", cli.weeks, cli.season);
            replay_season(&store, cli.season, cli.weeks, true)?;
            println!();
            print_standings(&store, cli.season, None)?;
        }
        Commands::Standings { limit } => {
            replay_season(&store, cli.season, cli.weeks, false)?;
            print_standings(&store, cli.season, limit)?;
        }
        Commands::Accuracy => {
            replay_season(&store, cli.season, cli.weeks, false)?;
            report_accuracy(&store, cli.season)?;
        }
    }

    Ok(())
}
