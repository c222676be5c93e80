//! Pure rating formulas
//!
//! Stateless numeric functions shared by the game processor and the
//! prediction engine. The logistic expected score comes from the
//! skillratings crate; the margin, tier and preseason adjustments layered on
//! top of it are specific to this league model.

use skillratings::elo::{expected_score as elo_expected_score, EloRating};

use crate::types::Tier;

/// Preseason rating base for FBS programs
pub const FBS_BASE_RATING: f64 = 1500.0;

/// Preseason rating base for FCS programs
pub const FCS_BASE_RATING: f64 = 1300.0;

/// Win probability for `rating_a` against `rating_b`
///
/// Standard logistic curve, `1 / (1 + 10^((b - a) / 400))`. The two
/// perspectives always sum to 1.0.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let (expected_a, _expected_b) = elo_expected_score(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
    );
    expected_a
}

/// Margin-of-victory multiplier, saturating at `cap`
///
/// A non-positive differential yields the neutral 1.0. Otherwise
/// `ln(differential + 1)`, floored at 1.0 and capped, so the factor is
/// monotonically non-decreasing in the differential and blowouts cannot
/// dominate a rating swing. The two call sites in this system use different
/// cap values; callers pass their configured cap rather than sharing one
/// global constant.
pub fn mov_multiplier(point_differential: i64, cap: f64) -> f64 {
    if point_differential <= 0 {
        return 1.0;
    }
    let raw = ((point_differential + 1) as f64).ln();
    raw.min(cap).max(1.0)
}

/// Cross-tier scaling factors as `(winner_factor, loser_factor)`
///
/// Explicit table over every tier pairing. Beating a lower tier is
/// discounted for the favorite and costly for the loser; upsets of a higher
/// tier are amplified for the underdog.
pub fn conference_multiplier(winner: Tier, loser: Tier) -> (f64, f64) {
    use Tier::{Fcs, GroupOfFive, Power};

    match (winner, loser) {
        (Power, Power) => (1.0, 1.0),
        (Power, GroupOfFive) => (0.9, 1.1),
        (Power, Fcs) => (0.5, 2.0),
        (GroupOfFive, Power) => (1.1, 0.9),
        (GroupOfFive, GroupOfFive) => (1.0, 1.0),
        (GroupOfFive, Fcs) => (0.5, 2.0),
        (Fcs, Power) => (2.0, 0.5),
        (Fcs, GroupOfFive) => (2.0, 0.5),
        (Fcs, Fcs) => (1.0, 1.0),
    }
}

/// Initial rating from tier, recruiting, transfer activity and returning
/// production
///
/// The breakpoints are product-defined constants, not derived values:
/// recruiting rank <=5 is worth +200, <=10 +150, <=25 +100, <=50 +50,
/// <=75 +25; the transfer bonus is the same shape at half weight
/// (<=5 +100, <=10 +75, <=25 +50, <=50 +25); returning production >=0.80 is
/// worth +40, >=0.60 +25, >=0.40 +10. The 999 unranked sentinel falls
/// through every bucket.
pub fn preseason_composite(
    tier: Tier,
    recruiting_rank: u32,
    transfer_rank: u32,
    returning_production: f64,
) -> f64 {
    let base = if tier == Tier::Fcs {
        FCS_BASE_RATING
    } else {
        FBS_BASE_RATING
    };

    let recruiting_bonus = if recruiting_rank <= 5 {
        200.0
    } else if recruiting_rank <= 10 {
        150.0
    } else if recruiting_rank <= 25 {
        100.0
    } else if recruiting_rank <= 50 {
        50.0
    } else if recruiting_rank <= 75 {
        25.0
    } else {
        0.0
    };

    let transfer_bonus = if transfer_rank <= 5 {
        100.0
    } else if transfer_rank <= 10 {
        75.0
    } else if transfer_rank <= 25 {
        50.0
    } else if transfer_rank <= 50 {
        25.0
    } else {
        0.0
    };

    let production_bonus = if returning_production >= 0.80 {
        40.0
    } else if returning_production >= 0.60 {
        25.0
    } else if returning_production >= 0.40 {
        10.0
    } else {
        0.0
    };

    base + recruiting_bonus + transfer_bonus + production_bonus
}
