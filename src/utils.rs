//! Utility functions for the rating engine

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique game ID
pub fn generate_game_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Round to two decimal places, the display precision for ratings and deltas
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to three decimal places, the display precision for probabilities
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_game_id();
        let id2 = generate_game_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(32.60264), 32.6);
        assert_eq!(round2(-32.605), -32.61);
        assert_eq!(round2(1500.0), 1500.0);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.592467), 0.592);
        assert_eq!(round3(0.5), 0.5);
    }
}
