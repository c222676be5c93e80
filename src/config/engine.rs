//! Engine configuration
//!
//! The original model scattered its home-field, K-factor and margin-cap
//! constants across call sites; here they live in one injected struct so the
//! places that intentionally differ (live processing vs retrospective
//! backfill use different margin caps) stay intentional.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{RatingError, Result};
use crate::types::{Season, Week};

/// K-factor selection policy
///
/// A closed set of strategies, each a pure function of the week. Replaces
/// the subclass-with-overridden-hooks variants of earlier iterations of this
/// model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KFactorPolicy {
    /// Same K for every week
    Fixed(f64),
    /// Full K early in the season, a damped K from `from_week` onwards
    LateSeasonDamped {
        base: f64,
        damped: f64,
        from_week: Week,
    },
}

impl KFactorPolicy {
    /// K-factor to apply for a game in the given week
    pub fn k_for_week(&self, week: Week) -> f64 {
        match *self {
            KFactorPolicy::Fixed(k) => k,
            KFactorPolicy::LateSeasonDamped {
                base,
                damped,
                from_week,
            } => {
                if week >= from_week {
                    damped
                } else {
                    base
                }
            }
        }
    }

    fn min_k(&self) -> f64 {
        match *self {
            KFactorPolicy::Fixed(k) => k,
            KFactorPolicy::LateSeasonDamped { base, damped, .. } => base.min(damped),
        }
    }
}

/// Tunable constants for game processing and forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub k_factor: KFactorPolicy,
    /// Home-field advantage in rating points, skipped at neutral sites
    pub home_field_advantage: f64,
    /// Margin-of-victory multiplier ceiling for this call site
    pub mov_cap: f64,
    /// Equal final scores credit the away side unless set
    pub award_ties_to_home: bool,
    /// Fallback rating when a historical snapshot is missing
    pub default_historical_rating: f64,
    /// Highest week accepted for processing, postseason included
    pub max_week: Week,
    pub min_season: Season,
    pub max_season: Season,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k_factor: KFactorPolicy::Fixed(32.0),
            home_field_advantage: 65.0,
            mov_cap: 2.5,
            award_ties_to_home: false,
            default_historical_rating: 1500.0,
            max_week: 19,
            min_season: 2000,
            max_season: 2100,
        }
    }
}

impl EngineConfig {
    /// Configuration for retrospective backfills
    ///
    /// Identical to the live configuration except for the tighter margin
    /// cap used on that path.
    pub fn backfill() -> Self {
        Self {
            mov_cap: 2.0,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var("GRIDIRON_K_FACTOR") {
            config.k_factor = KFactorPolicy::Fixed(value.parse()?);
        }
        if let Ok(value) = env::var("GRIDIRON_HOME_FIELD_ADVANTAGE") {
            config.home_field_advantage = value.parse()?;
        }
        if let Ok(value) = env::var("GRIDIRON_MOV_CAP") {
            config.mov_cap = value.parse()?;
        }
        if let Ok(value) = env::var("GRIDIRON_TIES_TO_HOME") {
            config.award_ties_to_home = value.parse()?;
        }
        if let Ok(value) = env::var("GRIDIRON_MAX_WEEK") {
            config.max_week = value.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.k_factor.min_k() <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }

        if self.home_field_advantage < 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Home-field advantage must be non-negative".to_string(),
            }
            .into());
        }

        if self.mov_cap < 1.0 {
            return Err(RatingError::ConfigurationError {
                message: "Margin-of-victory cap must be at least 1.0".to_string(),
            }
            .into());
        }

        if self.default_historical_rating <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Default historical rating must be positive".to_string(),
            }
            .into());
        }

        if self.min_season > self.max_season {
            return Err(RatingError::ConfigurationError {
                message: "Season bounds are inverted".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
