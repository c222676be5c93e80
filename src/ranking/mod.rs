//! Standings, strength of schedule and season lifecycle
//!
//! Pure reads over current team and game state, plus the season reset.

pub mod engine;

// Re-export commonly used types
pub use engine::RankingEngine;
