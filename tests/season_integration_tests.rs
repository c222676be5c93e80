//! Integration tests for the rating engine
//!
//! These tests validate the whole engine working together over a small
//! league: sequential game processing, rankings and strength of schedule,
//! weekly snapshots, retrospective predictions and accuracy scoring, and
//! the season reset.

use std::sync::Arc;

use gridiron_rating::config::EngineConfig;
use gridiron_rating::prediction::PredictionEngine;
use gridiron_rating::ranking::RankingEngine;
use gridiron_rating::rating::GameProcessor;
use gridiron_rating::storage::{InMemoryLeagueStore, LeagueStore, RecordingLeagueStore};
use gridiron_rating::types::{Game, ProcessOutcome, Team, Tier, UNRANKED};

const SEASON: u16 = 2025;

/// Four-team league covering all three tiers
fn seed_league(store: &dyn LeagueStore) {
    let teams = vec![
        Team::new("Crimson Tech", Tier::Power, 4, 8, 0.65),
        Team::new("Golden Valley", Tier::Power, 30, 45, 0.85),
        Team::new("Bayou Central", Tier::GroupOfFive, 80, UNRANKED, 0.70),
        Team::new("Pinecrest State", Tier::Fcs, UNRANKED, UNRANKED, 0.60),
    ];
    for team in teams {
        store.upsert_team(team).unwrap();
    }
}

/// Process one completed game and write the mutated state back
fn play(
    store: &dyn LeagueStore,
    processor: &GameProcessor,
    home: &str,
    away: &str,
    week: u8,
    home_score: u32,
    away_score: u32,
) -> ProcessOutcome {
    let mut game = Game::scheduled(home, away, week, SEASON).with_result(home_score, away_score);
    let mut home_team = store.get_team(home).unwrap().unwrap();
    let mut away_team = store.get_team(away).unwrap().unwrap();

    let outcome = processor
        .process_game(&mut game, &mut home_team, &mut away_team)
        .unwrap();

    store.upsert_team(home_team).unwrap();
    store.upsert_team(away_team).unwrap();
    store.upsert_game(game).unwrap();
    outcome
}

#[test]
fn test_full_season_flow() {
    let store: Arc<RecordingLeagueStore> = Arc::new(RecordingLeagueStore::new());
    seed_league(store.as_ref());

    let processor = GameProcessor::new(EngineConfig::default()).unwrap();
    let ranking = RankingEngine::new(store.clone() as Arc<dyn LeagueStore>);

    // Preseason snapshot, then two weeks of play
    ranking.save_weekly_snapshot(SEASON, 0).unwrap();

    let week1 = play(
        store.as_ref(),
        &processor,
        "Crimson Tech",
        "Pinecrest State",
        1,
        52,
        10,
    );
    assert!(week1.summary().is_some());
    play(
        store.as_ref(),
        &processor,
        "Golden Valley",
        "Bayou Central",
        1,
        31,
        17,
    );
    ranking.save_weekly_snapshot(SEASON, 1).unwrap();

    play(
        store.as_ref(),
        &processor,
        "Golden Valley",
        "Crimson Tech",
        2,
        20,
        27,
    );
    play(
        store.as_ref(),
        &processor,
        "Bayou Central",
        "Pinecrest State",
        2,
        38,
        21,
    );
    ranking.save_weekly_snapshot(SEASON, 2).unwrap();

    assert_eq!(store.snapshot_calls(), vec![(SEASON, 0), (SEASON, 1), (SEASON, 2)]);

    // Standings: descending ratings, 1-based ranks, undefeated Power on top
    let rankings = ranking.current_rankings(SEASON, None).unwrap();
    assert_eq!(rankings.len(), 4);
    assert_eq!(rankings[0].team, "Crimson Tech");
    assert_eq!(rankings[0].rank, 1);
    assert_eq!(rankings[0].wins, 2);
    for pair in rankings.windows(2) {
        assert!(pair[0].rating >= pair[1].rating);
    }

    // Every team played, so every SOS is positive and every sos_rank assigned
    for entry in &rankings {
        assert!(entry.sos > 0.0);
        assert!((1..=4).contains(&entry.sos_rank));
    }

    // Processed games carry audit deltas
    let games = store.games_for_season(SEASON).unwrap();
    assert_eq!(games.len(), 4);
    for game in &games {
        assert!(game.processed);
        assert!(game.home_delta.is_some());
        assert!(game.away_delta.is_some());
    }
}

#[test]
fn test_reprocessing_is_idempotent_at_the_store_level() {
    let store = Arc::new(InMemoryLeagueStore::new());
    seed_league(store.as_ref());
    let processor = GameProcessor::new(EngineConfig::default()).unwrap();

    play(
        store.as_ref(),
        &processor,
        "Crimson Tech",
        "Golden Valley",
        1,
        24,
        21,
    );
    let rating_after_first = store.get_team("Crimson Tech").unwrap().unwrap().rating;

    // Re-run the same stored game through the processor
    let mut game = store.games_for_season(SEASON).unwrap().remove(0);
    let mut home = store.get_team("Crimson Tech").unwrap().unwrap();
    let mut away = store.get_team("Golden Valley").unwrap().unwrap();
    let second = processor
        .process_game(&mut game, &mut home, &mut away)
        .unwrap();

    assert!(matches!(second, ProcessOutcome::AlreadyProcessed { .. }));
    assert_eq!(home.rating, rating_after_first);
}

#[test]
fn test_excluded_game_never_reaches_ratings_or_sos() {
    let store = Arc::new(InMemoryLeagueStore::new());
    seed_league(store.as_ref());
    let processor = GameProcessor::new(EngineConfig::default()).unwrap();

    let mut game = Game::scheduled("Crimson Tech", "Pinecrest State", 1, SEASON).with_result(45, 0);
    game.excluded = true;
    let mut home = store.get_team("Crimson Tech").unwrap().unwrap();
    let mut away = store.get_team("Pinecrest State").unwrap().unwrap();

    let result = processor.process_game(&mut game, &mut home, &mut away);
    assert!(result.is_err());
    store.upsert_game(game).unwrap();

    let ranking = RankingEngine::new(store.clone() as Arc<dyn LeagueStore>);
    assert_eq!(ranking.calculate_sos("Crimson Tech", SEASON).unwrap(), 0.0);

    let crimson = store.get_team("Crimson Tech").unwrap().unwrap();
    assert_eq!(crimson.rating, crimson.initial_rating);
}

#[test]
fn test_retrospective_predictions_use_pregame_ratings() {
    let store = Arc::new(InMemoryLeagueStore::new());
    seed_league(store.as_ref());
    let processor = GameProcessor::new(EngineConfig::default()).unwrap();
    let ranking = RankingEngine::new(store.clone() as Arc<dyn LeagueStore>);

    ranking.save_weekly_snapshot(SEASON, 0).unwrap();
    play(
        store.as_ref(),
        &processor,
        "Crimson Tech",
        "Golden Valley",
        1,
        35,
        14,
    );
    ranking.save_weekly_snapshot(SEASON, 1).unwrap();
    play(
        store.as_ref(),
        &processor,
        "Golden Valley",
        "Bayou Central",
        2,
        28,
        24,
    );
    ranking.save_weekly_snapshot(SEASON, 2).unwrap();

    let predictor = PredictionEngine::new(
        EngineConfig::backfill(),
        store.clone() as Arc<dyn LeagueStore>,
    )
    .unwrap();

    let games = store.games_for_season(SEASON).unwrap();
    let week2_game = games.iter().find(|g| g.week == 2).unwrap();

    let prediction = predictor
        .predict_with_historical_ratings(week2_game, SEASON, 2)
        .unwrap();

    // Ratings come from the week-1 snapshot: Golden Valley already carries
    // its week-1 loss, Bayou Central is untouched preseason
    let snapshot_home = store.snapshot_rating("Golden Valley", SEASON, 1).unwrap().unwrap();
    let snapshot_away = store.snapshot_rating("Bayou Central", SEASON, 1).unwrap().unwrap();
    assert_eq!(prediction.home_rating, snapshot_home);
    assert_eq!(prediction.away_rating, snapshot_away);

    // Live ratings have since moved on for Golden Valley
    let live_home = store.get_team("Golden Valley").unwrap().unwrap().rating;
    assert!((live_home - snapshot_home).abs() > 1.0);
}

#[test]
fn test_backfill_and_accuracy_over_a_played_season() {
    let store = Arc::new(InMemoryLeagueStore::new());
    seed_league(store.as_ref());
    let processor = GameProcessor::new(EngineConfig::default()).unwrap();
    let ranking = RankingEngine::new(store.clone() as Arc<dyn LeagueStore>);

    ranking.save_weekly_snapshot(SEASON, 0).unwrap();
    play(store.as_ref(), &processor, "Crimson Tech", "Bayou Central", 1, 41, 13);
    play(store.as_ref(), &processor, "Golden Valley", "Pinecrest State", 1, 34, 10);
    ranking.save_weekly_snapshot(SEASON, 1).unwrap();
    play(store.as_ref(), &processor, "Crimson Tech", "Golden Valley", 2, 30, 23);
    play(store.as_ref(), &processor, "Bayou Central", "Pinecrest State", 2, 27, 20);
    ranking.save_weekly_snapshot(SEASON, 2).unwrap();

    let predictor = PredictionEngine::new(
        EngineConfig::backfill(),
        store.clone() as Arc<dyn LeagueStore>,
    )
    .unwrap();

    let games = store.games_for_season(SEASON).unwrap();
    let mut summary = predictor.backfill_predictions(&games, SEASON);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.degraded, 0);

    for prediction in summary.predictions.iter_mut() {
        let game = store.get_game(prediction.game_id).unwrap().unwrap();
        predictor.score_prediction(prediction, game.home_score, game.away_score);
    }

    let report = predictor.accuracy_metrics(&summary.predictions);
    assert_eq!(report.sample_count, 4);
    assert!(report.accuracy >= 0.0 && report.accuracy <= 1.0);
    assert!(report.brier_score >= 0.0 && report.brier_score <= 1.0);
    assert!(report.log_loss.is_finite());
    assert!(report.mean_confidence >= 0.0 && report.mean_confidence <= 0.5);
}

#[test]
fn test_season_reset_returns_league_to_preseason() {
    let store = Arc::new(InMemoryLeagueStore::new());
    seed_league(store.as_ref());
    let processor = GameProcessor::new(EngineConfig::default()).unwrap();
    let ranking = RankingEngine::new(store.clone() as Arc<dyn LeagueStore>);

    play(store.as_ref(), &processor, "Crimson Tech", "Golden Valley", 1, 28, 14);
    play(store.as_ref(), &processor, "Bayou Central", "Crimson Tech", 2, 17, 38);

    ranking.reset_season(SEASON + 1).unwrap();

    for team in store.all_teams().unwrap() {
        assert_eq!(team.rating, team.initial_rating);
        assert_eq!(team.wins, 0);
        assert_eq!(team.losses, 0);
    }

    // Preseason composite for the top seed: 1500 + 200 + 75 + 25
    let crimson = store.get_team("Crimson Tech").unwrap().unwrap();
    assert_eq!(crimson.rating, 1800.0);
}
