//! # Time-Context Weight Profiles
//!
//! The selector blends lane scores using a weight profile chosen by
//! time-of-day context, with a high-engagement override: users who already
//! engage heavily get more discovery/trending and less personalization, so
//! their feed does not go stale inside a filter bubble.
//!
//! The table is an explicit, typed decision table rather than conditionals
//! scattered through scoring code; it is validated once at engine
//! construction and invalid tables are fatal.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DiscoveryError;

const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Coarse time-of-day bucket for weight selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeContext {
    Morning,
    Lunch,
    Dinner,
    General,
}

impl TimeContext {
    /// Bucket an hour of day (0-23, user-local) into a context
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=10 => TimeContext::Morning,
            11..=14 => TimeContext::Lunch,
            17..=21 => TimeContext::Dinner,
            _ => TimeContext::General,
        }
    }

    /// Context for a UTC timestamp
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self::from_hour(at.hour())
    }
}

/// Lane blend weights; components are non-negative and sum to at most 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub personalized: f64,
    pub trending: f64,
    pub discovery: f64,
}

impl WeightProfile {
    pub fn sum(&self) -> f64 {
        self.personalized + self.trending + self.discovery
    }

    fn check(&self, label: &str) -> Result<(), DiscoveryError> {
        if self.personalized < 0.0 || self.trending < 0.0 || self.discovery < 0.0 {
            return Err(DiscoveryError::Configuration(format!(
                "weight profile '{label}' has a negative component"
            )));
        }
        if self.sum() > 1.0 + WEIGHT_SUM_EPSILON {
            return Err(DiscoveryError::Configuration(format!(
                "weight profile '{label}' sums to {:.3}, expected <= 1",
                self.sum()
            )));
        }
        Ok(())
    }
}

/// Decision table mapping time context and engagement to a weight profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub morning: WeightProfile,
    pub lunch: WeightProfile,
    pub dinner: WeightProfile,
    pub general: WeightProfile,
    /// Override applied when the user's engagement score exceeds the
    /// threshold, regardless of time context
    pub high_engagement: WeightProfile,
    pub high_engagement_threshold: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            morning: WeightProfile {
                personalized: 0.45,
                trending: 0.30,
                discovery: 0.25,
            },
            lunch: WeightProfile {
                personalized: 0.45,
                trending: 0.35,
                discovery: 0.20,
            },
            dinner: WeightProfile {
                personalized: 0.55,
                trending: 0.25,
                discovery: 0.20,
            },
            general: WeightProfile {
                personalized: 0.40,
                trending: 0.30,
                discovery: 0.30,
            },
            high_engagement: WeightProfile {
                personalized: 0.25,
                trending: 0.35,
                discovery: 0.40,
            },
            high_engagement_threshold: 2.5,
        }
    }
}

impl WeightTable {
    /// Validate every profile in the table
    ///
    /// Called once at engine construction; a broken table must fail loudly
    /// there, never fall back to arbitrary weights at request time.
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        self.morning.check("morning")?;
        self.lunch.check("lunch")?;
        self.dinner.check("dinner")?;
        self.general.check("general")?;
        self.high_engagement.check("high_engagement")?;
        if self.high_engagement_threshold < 0.0 {
            return Err(DiscoveryError::Configuration(
                "high_engagement_threshold must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Pick the profile for a request
    pub fn select(&self, context: TimeContext, engagement_score: f64) -> WeightProfile {
        if engagement_score > self.high_engagement_threshold {
            return self.high_engagement;
        }
        match context {
            TimeContext::Morning => self.morning,
            TimeContext::Lunch => self.lunch,
            TimeContext::Dinner => self.dinner,
            TimeContext::General => self.general,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert!(WeightTable::default().validate().is_ok());
    }

    #[test]
    fn test_profiles_sum_at_most_one() {
        let table = WeightTable::default();
        for profile in [
            table.morning,
            table.lunch,
            table.dinner,
            table.general,
            table.high_engagement,
        ] {
            assert!(profile.sum() <= 1.0 + WEIGHT_SUM_EPSILON);
        }
    }

    #[test]
    fn test_hour_bucketing() {
        assert_eq!(TimeContext::from_hour(7), TimeContext::Morning);
        assert_eq!(TimeContext::from_hour(12), TimeContext::Lunch);
        assert_eq!(TimeContext::from_hour(19), TimeContext::Dinner);
        assert_eq!(TimeContext::from_hour(2), TimeContext::General);
        assert_eq!(TimeContext::from_hour(15), TimeContext::General);
    }

    #[test]
    fn test_select_by_context() {
        let table = WeightTable::default();
        assert_eq!(table.select(TimeContext::Dinner, 0.5), table.dinner);
        assert_eq!(table.select(TimeContext::General, 0.5), table.general);
    }

    #[test]
    fn test_high_engagement_override() {
        let table = WeightTable::default();
        let profile = table.select(TimeContext::Dinner, 5.0);
        assert_eq!(profile, table.high_engagement);
        assert!(profile.discovery > table.dinner.discovery);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut table = WeightTable::default();
        table.lunch.trending = -0.1;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_oversized_sum_rejected() {
        let mut table = WeightTable::default();
        table.dinner = WeightProfile {
            personalized: 0.6,
            trending: 0.5,
            discovery: 0.3,
        };
        let err = table.validate().unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration(_)));
    }
}
