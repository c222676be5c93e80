//! Gridiron Rating - incremental Elo-style rating engine for college football
//!
//! This crate maintains per-season team ratings updated game by game, with
//! home-field adjustment, margin-of-victory scaling, conference-tier
//! multipliers and preseason-composite initialization, and derives rankings,
//! strength of schedule and calibrated game forecasts from them.

pub mod config;
pub mod error;
pub mod prediction;
pub mod ranking;
pub mod rating;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use config::{EngineConfig, KFactorPolicy};
pub use prediction::{AccuracyReport, PredictionEngine};
pub use ranking::RankingEngine;
pub use rating::GameProcessor;
pub use storage::{InMemoryLeagueStore, LeagueStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
