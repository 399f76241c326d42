//! # Engine Configuration
//!
//! Tunable tables for scoring and selection. The composite coefficients,
//! velocity bands, freshness curve, and quality tiers are policy choices
//! that product tunes without code changes, so they live here as data with
//! `Default` impls and a single validation pass.
//!
//! Validation failures are fatal (`DiscoveryError::Configuration`): a
//! silently-patched weight table would produce an unauditable ranking.

use serde::{Deserialize, Serialize};

use crate::errors::DiscoveryError;
use crate::weights::WeightTable;

const COMPOSITE_SUM_EPSILON: f64 = 1e-6;

/// Blend coefficients for the composite score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub engagement: f64,
    pub personalization: f64,
    pub freshness: f64,
    pub quality: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            engagement: 0.40,
            personalization: 0.35,
            freshness: 0.15,
            quality: 0.10,
        }
    }
}

impl CompositeWeights {
    pub fn sum(&self) -> f64 {
        self.engagement + self.personalization + self.freshness + self.quality
    }
}

/// One age band of the engagement velocity curve
///
/// Later bands use smaller interaction weights and larger age scales, so
/// recent high-velocity engagement outranks stale high-total engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityBand {
    /// Upper age bound in hours; `None` for the open-ended last band
    pub max_age_hours: Option<f64>,
    pub like_weight: f64,
    pub save_weight: f64,
    pub comment_weight: f64,
    /// Multiplier applied to age hours in the normalization denominator
    pub age_scale: f64,
}

/// Engagement velocity bands, ordered by age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityConfig {
    pub bands: Vec<VelocityBand>,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                VelocityBand {
                    max_age_hours: Some(24.0),
                    like_weight: 1.0,
                    save_weight: 1.5,
                    comment_weight: 2.0,
                    age_scale: 1.0,
                },
                VelocityBand {
                    max_age_hours: Some(168.0),
                    like_weight: 0.7,
                    save_weight: 1.0,
                    comment_weight: 1.4,
                    age_scale: 2.0,
                },
                VelocityBand {
                    max_age_hours: None,
                    like_weight: 0.4,
                    save_weight: 0.6,
                    comment_weight: 0.8,
                    age_scale: 4.0,
                },
            ],
        }
    }
}

/// Fixed point values for the personalization bonus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationPoints {
    pub followed_creator: f64,
    pub playable_media: f64,
    pub rich_ingredient_list: f64,
    /// Ingredient count at which the richness bonus applies
    pub min_rich_ingredients: usize,
    /// Points per pantry match percentage point, when match data is present
    pub pantry_match_scale: f64,
}

impl Default for PersonalizationPoints {
    fn default() -> Self {
        Self {
            followed_creator: 40.0,
            playable_media: 30.0,
            rich_ingredient_list: 30.0,
            min_rich_ingredients: 4,
            pantry_match_scale: 0.3,
        }
    }
}

/// Freshness decay curve
///
/// Full score inside the first window, linear decay to `floor_score` by the
/// end of the second, then a slow exponential tail that never reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreshnessConfig {
    pub full_score: f64,
    pub full_window_hours: f64,
    pub floor_score: f64,
    pub decay_window_hours: f64,
    /// Asymptotic minimum for very old content
    pub tail_floor: f64,
    pub tail_half_life_days: f64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            full_score: 100.0,
            full_window_hours: 24.0,
            floor_score: 30.0,
            decay_window_hours: 168.0,
            tail_floor: 5.0,
            tail_half_life_days: 30.0,
        }
    }
}

/// Quality score tiers and bonuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// (minimum description length, points), checked highest first
    pub description_tiers: Vec<(usize, f64)>,
    pub playable_media_points: f64,
    /// Flat bonus for human-authored content (the whole pool, by policy)
    pub human_authored_points: f64,
    /// (minimum ingredient count, points), checked highest first
    pub ingredient_tiers: Vec<(usize, f64)>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            description_tiers: vec![(200, 30.0), (80, 20.0), (20, 10.0)],
            playable_media_points: 25.0,
            human_authored_points: 20.0,
            ingredient_tiers: vec![(8, 25.0), (4, 15.0), (1, 5.0)],
        }
    }
}

/// Lane classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneThresholds {
    pub personalized_min_score: f64,
    pub trending_min_velocity: f64,
    pub trending_max_age_hours: f64,
}

impl Default for LaneThresholds {
    fn default() -> Self {
        Self {
            personalized_min_score: 50.0,
            trending_min_velocity: 20.0,
            trending_max_age_hours: 48.0,
        }
    }
}

/// All scorer tunables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub composite: CompositeWeights,
    pub velocity: VelocityConfig,
    pub personalization: PersonalizationPoints,
    pub freshness: FreshnessConfig,
    pub quality: QualityConfig,
    pub lanes: LaneThresholds,
}

/// Selector tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Jitter is uniform in [0, jitter_range)
    pub jitter_range: f64,
    /// Minimum lane weight for content from followed creators
    pub following_floor: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            jitter_range: 10.0,
            following_floor: 0.25,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub weights: WeightTable,
    pub selector: SelectorConfig,
}

impl EngineConfig {
    /// Validate all tables; any violation is fatal
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        let composite = &self.scoring.composite;
        if composite.engagement < 0.0
            || composite.personalization < 0.0
            || composite.freshness < 0.0
            || composite.quality < 0.0
        {
            return Err(DiscoveryError::Configuration(
                "composite weights must be non-negative".to_string(),
            ));
        }
        if (composite.sum() - 1.0).abs() > COMPOSITE_SUM_EPSILON {
            return Err(DiscoveryError::Configuration(format!(
                "composite weights sum to {:.3}, expected 1.0",
                composite.sum()
            )));
        }

        let bands = &self.scoring.velocity.bands;
        if bands.is_empty() {
            return Err(DiscoveryError::Configuration(
                "velocity config needs at least one band".to_string(),
            ));
        }
        if bands.last().and_then(|b| b.max_age_hours).is_some() {
            return Err(DiscoveryError::Configuration(
                "last velocity band must be open-ended".to_string(),
            ));
        }
        let mut previous_bound = 0.0;
        for band in bands {
            if band.age_scale <= 0.0 {
                return Err(DiscoveryError::Configuration(
                    "velocity band age_scale must be positive".to_string(),
                ));
            }
            if let Some(bound) = band.max_age_hours {
                if bound <= previous_bound {
                    return Err(DiscoveryError::Configuration(
                        "velocity band bounds must be strictly increasing".to_string(),
                    ));
                }
                previous_bound = bound;
            }
        }

        let freshness = &self.scoring.freshness;
        if freshness.tail_floor <= 0.0 || freshness.floor_score < freshness.tail_floor {
            return Err(DiscoveryError::Configuration(
                "freshness floors must be positive and ordered".to_string(),
            ));
        }

        if self.selector.jitter_range < 0.0 {
            return Err(DiscoveryError::Configuration(
                "jitter_range must be non-negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.selector.following_floor) {
            return Err(DiscoveryError::Configuration(
                "following_floor must be within [0, 1]".to_string(),
            ));
        }

        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_composite_weights_must_sum_to_one() {
        let mut config = EngineConfig::default();
        config.scoring.composite.engagement = 0.9;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration(_)));
    }

    #[test]
    fn test_last_velocity_band_must_be_open() {
        let mut config = EngineConfig::default();
        config.scoring.velocity.bands.last_mut().unwrap().max_age_hours = Some(500.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_band_bounds_must_increase() {
        let mut config = EngineConfig::default();
        config.scoring.velocity.bands[1].max_age_hours = Some(12.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_following_floor_bounds() {
        let mut config = EngineConfig::default();
        config.selector.following_floor = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_weight_table_is_caught() {
        let mut config = EngineConfig::default();
        config.weights.morning.personalized = -0.2;
        assert!(config.validate().is_err());
    }
}
