//! # Candidate Scorer
//!
//! Combines engagement velocity, personalization, freshness, and quality
//! into a composite score per candidate, and classifies each candidate into
//! a feed lane. Every coefficient comes from [`ScoringConfig`]; weight
//! tuning is a config change, not a code change.
//!
//! Scoring is pure over an immutable request snapshot. Batch scoring fans
//! out across candidates since each candidate is independent.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::behavior::BehaviorProfile;
use crate::candidate_model::RecipeCandidate;
use crate::config::ScoringConfig;
use crate::pantry_match::MatchResult;

/// Feed lane a candidate is classified into before weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Personalized,
    Trending,
    Following,
    Discovery,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Personalized => "personalized",
            Lane::Trending => "trending",
            Lane::Following => "following",
            Lane::Discovery => "discovery",
        }
    }
}

/// Per-candidate sub-scores and composite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub engagement_velocity: f64,
    pub personalization_score: f64,
    pub freshness_score: f64,
    pub quality_score: f64,
    pub composite_score: f64,
    pub lane: Lane,
}

/// A candidate annotated with its breakdown and optional pantry match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: RecipeCandidate,
    pub breakdown: ScoreBreakdown,
    pub match_result: Option<MatchResult>,
}

/// Immutable per-request inputs to scoring beyond the candidate itself
///
/// The behavior profile influences ranking through weight-profile
/// selection (see [`crate::weights::WeightTable`]); scoring consumes the
/// follow graph and pantry match annotations directly.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub now: DateTime<Utc>,
    pub followed_creators: &'a HashSet<String>,
    /// Per-recipe-id pantry match results, present for pantry-aware requests
    pub pantry_matches: Option<&'a HashMap<String, MatchResult>>,
}

/// Scorer over a fixed configuration
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    config: ScoringConfig,
}

impl CandidateScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one candidate
    pub fn score(&self, candidate: &RecipeCandidate, ctx: &ScoringContext<'_>) -> ScoreBreakdown {
        // Whole-hour age granularity keeps same-session orderings stable
        // while the clock advances between repeated requests
        let age_hours = candidate.age_hours(ctx.now).floor();

        let engagement_velocity = self.engagement_velocity(candidate, age_hours);
        let personalization_score = self.personalization(candidate, ctx);
        let freshness_score = self.freshness(age_hours);
        let quality_score = self.quality(candidate);

        let weights = &self.config.composite;
        let composite_score = engagement_velocity * weights.engagement
            + personalization_score * weights.personalization
            + freshness_score * weights.freshness
            + quality_score * weights.quality;

        let lane = self.classify_lane(
            engagement_velocity,
            personalization_score,
            age_hours,
            ctx.followed_creators.contains(&candidate.creator_id),
        );

        ScoreBreakdown {
            engagement_velocity,
            personalization_score,
            freshness_score,
            quality_score,
            composite_score,
            lane,
        }
    }

    /// Score a pool in parallel, attaching pantry match annotations
    pub fn score_batch(
        &self,
        candidates: Vec<RecipeCandidate>,
        profile: &BehaviorProfile,
        ctx: &ScoringContext<'_>,
    ) -> Vec<ScoredCandidate> {
        log::debug!(
            "Scoring {} candidates (engagement score {:.2})",
            candidates.len(),
            profile.engagement_score
        );

        candidates
            .into_par_iter()
            .map(|candidate| {
                let breakdown = self.score(&candidate, ctx);
                let match_result = ctx
                    .pantry_matches
                    .and_then(|matches| matches.get(&candidate.id).cloned());
                ScoredCandidate {
                    candidate,
                    breakdown,
                    match_result,
                }
            })
            .collect()
    }

    /// Decaying engagement rate over the band matching the candidate's age
    fn engagement_velocity(&self, candidate: &RecipeCandidate, age_hours: f64) -> f64 {
        let band = match self
            .config
            .velocity
            .bands
            .iter()
            .find(|band| band.max_age_hours.map_or(true, |max| age_hours <= max))
        {
            Some(band) => band,
            None => return 0.0,
        };

        let weighted = candidate.likes as f64 * band.like_weight
            + candidate.saves as f64 * band.save_weight
            + candidate.comments as f64 * band.comment_weight;
        let denominator = (age_hours * band.age_scale).max(1.0);

        weighted / denominator
    }

    fn personalization(&self, candidate: &RecipeCandidate, ctx: &ScoringContext<'_>) -> f64 {
        let points = &self.config.personalization;
        let mut score = 0.0;

        if ctx.followed_creators.contains(&candidate.creator_id) {
            score += points.followed_creator;
        }
        if candidate.has_playable_media() {
            score += points.playable_media;
        }
        if candidate.ingredients.len() >= points.min_rich_ingredients {
            score += points.rich_ingredient_list;
        }
        if let Some(matches) = ctx.pantry_matches {
            if let Some(result) = matches.get(&candidate.id) {
                score += f64::from(result.match_percentage) * points.pantry_match_scale;
            }
        }

        score
    }

    /// Full score inside the first day, linear decay to the floor over the
    /// first week, then a slow tail that stays above zero
    fn freshness(&self, age_hours: f64) -> f64 {
        let curve = &self.config.freshness;

        if age_hours <= curve.full_window_hours {
            return curve.full_score;
        }
        if age_hours <= curve.decay_window_hours {
            let span = (curve.decay_window_hours - curve.full_window_hours).max(1.0);
            let progress = (age_hours - curve.full_window_hours) / span;
            return curve.full_score - (curve.full_score - curve.floor_score) * progress;
        }

        let days_past = (age_hours - curve.decay_window_hours) / 24.0;
        let decay = (-days_past * std::f64::consts::LN_2 / curve.tail_half_life_days).exp();
        curve.tail_floor + (curve.floor_score - curve.tail_floor) * decay
    }

    fn quality(&self, candidate: &RecipeCandidate) -> f64 {
        let quality = &self.config.quality;
        let mut score = tier_points(&quality.description_tiers, candidate.description.trim().len());

        if candidate.has_playable_media() {
            score += quality.playable_media_points;
        }
        if !candidate.is_ai_generated {
            score += quality.human_authored_points;
        }
        score += tier_points(&quality.ingredient_tiers, candidate.ingredients.len());

        score
    }

    fn classify_lane(
        &self,
        engagement_velocity: f64,
        personalization_score: f64,
        age_hours: f64,
        creator_followed: bool,
    ) -> Lane {
        let thresholds = &self.config.lanes;
        if personalization_score >= thresholds.personalized_min_score {
            Lane::Personalized
        } else if engagement_velocity >= thresholds.trending_min_velocity
            && age_hours <= thresholds.trending_max_age_hours
        {
            Lane::Trending
        } else if creator_followed {
            Lane::Following
        } else {
            Lane::Discovery
        }
    }
}

/// Points for the highest tier whose minimum the value meets
fn tier_points(tiers: &[(usize, f64)], value: usize) -> f64 {
    tiers
        .iter()
        .find(|(minimum, _)| value >= *minimum)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_model::RecipeIngredient;
    use chrono::Duration;

    fn scorer() -> CandidateScorer {
        CandidateScorer::new(ScoringConfig::default())
    }

    fn empty_ctx(now: DateTime<Utc>, followed: &HashSet<String>) -> ScoringContext<'_> {
        ScoringContext {
            now,
            followed_creators: followed,
            pantry_matches: None,
        }
    }

    fn ingredients(n: usize) -> Vec<RecipeIngredient> {
        (0..n)
            .map(|i| RecipeIngredient::new(&format!("ingredient {i}"), 1.0, "unit"))
            .collect()
    }

    #[test]
    fn test_velocity_rewards_recent_engagement() {
        let now = Utc::now();
        let followed = HashSet::new();
        let ctx = empty_ctx(now, &followed);
        let scorer = scorer();

        let ages = [2, 100, 400];
        let velocities: Vec<f64> = ages
            .iter()
            .map(|hours| {
                let candidate = RecipeCandidate::new("r", "u", now - Duration::hours(*hours))
                    .with_engagement(100, 40, 20, 1000);
                scorer.score(&candidate, &ctx).engagement_velocity
            })
            .collect();

        assert!(velocities[0] > velocities[1]);
        assert!(velocities[1] > velocities[2]);
    }

    #[test]
    fn test_velocity_zero_engagement_is_zero() {
        let now = Utc::now();
        let followed = HashSet::new();
        let ctx = empty_ctx(now, &followed);
        let candidate = RecipeCandidate::new("r", "u", now - Duration::hours(5));

        assert_eq!(scorer().score(&candidate, &ctx).engagement_velocity, 0.0);
    }

    #[test]
    fn test_freshness_curve() {
        let scorer = scorer();

        assert_eq!(scorer.freshness(2.0), 100.0);
        assert_eq!(scorer.freshness(24.0), 100.0);

        let mid = scorer.freshness(96.0);
        assert!(mid < 100.0 && mid > 30.0);

        assert!((scorer.freshness(168.0) - 30.0).abs() < 1e-9);

        // Old content decays slowly but never to zero
        let one_year = scorer.freshness(24.0 * 365.0);
        assert!(one_year > 0.0);
        assert!(one_year < 30.0);

        let ten_years = scorer.freshness(24.0 * 3650.0);
        assert!(ten_years > 0.0);
    }

    #[test]
    fn test_personalization_bonuses_accumulate() {
        let now = Utc::now();
        let mut followed = HashSet::new();
        followed.insert("chef".to_string());
        let ctx = empty_ctx(now, &followed);
        let scorer = scorer();

        let bare = RecipeCandidate::new("r1", "nobody", now);
        assert_eq!(scorer.score(&bare, &ctx).personalization_score, 0.0);

        let loaded = RecipeCandidate::new("r2", "chef", now)
            .with_video("https://cdn.example/v.mp4")
            .with_ingredients(ingredients(5));
        let score = scorer.score(&loaded, &ctx).personalization_score;
        assert_eq!(score, 40.0 + 30.0 + 30.0);
    }

    #[test]
    fn test_pantry_match_feeds_personalization() {
        let now = Utc::now();
        let followed = HashSet::new();
        let mut matches = HashMap::new();
        matches.insert(
            "r1".to_string(),
            MatchResult {
                match_percentage: 80,
                matched_ingredients: vec![],
                missing_ingredients: vec![],
            },
        );
        let ctx = ScoringContext {
            now,
            followed_creators: &followed,
            pantry_matches: Some(&matches),
        };

        let candidate = RecipeCandidate::new("r1", "u", now);
        let score = scorer().score(&candidate, &ctx).personalization_score;
        assert_eq!(score, 80.0 * 0.3);
    }

    #[test]
    fn test_quality_tiers() {
        let now = Utc::now();
        let followed = HashSet::new();
        let ctx = empty_ctx(now, &followed);
        let scorer = scorer();

        let sparse = RecipeCandidate::new("r1", "u", now);
        // Human-authored bonus only
        assert_eq!(scorer.score(&sparse, &ctx).quality_score, 20.0);

        let rich = RecipeCandidate::new("r2", "u", now)
            .with_description(&"a".repeat(250))
            .with_video("https://cdn.example/v.mp4")
            .with_ingredients(ingredients(9));
        // 30 (description) + 25 (media) + 20 (human) + 25 (ingredients)
        assert_eq!(scorer.score(&rich, &ctx).quality_score, 100.0);
    }

    #[test]
    fn test_composite_respects_config_weights() {
        let now = Utc::now();
        let followed = HashSet::new();
        let ctx = empty_ctx(now, &followed);

        let mut config = ScoringConfig::default();
        config.composite.engagement = 1.0;
        config.composite.personalization = 0.0;
        config.composite.freshness = 0.0;
        config.composite.quality = 0.0;
        let scorer = CandidateScorer::new(config);

        let candidate = RecipeCandidate::new("r", "u", now - Duration::hours(2))
            .with_engagement(10, 5, 1, 100);
        let breakdown = scorer.score(&candidate, &ctx);
        assert!((breakdown.composite_score - breakdown.engagement_velocity).abs() < 1e-9);
    }

    #[test]
    fn test_lane_classification() {
        let now = Utc::now();
        let mut followed = HashSet::new();
        followed.insert("chef".to_string());
        let ctx = empty_ctx(now, &followed);
        let scorer = scorer();

        // High personalization wins first
        let personalized = RecipeCandidate::new("r1", "chef", now)
            .with_video("https://cdn.example/v.mp4")
            .with_ingredients(ingredients(4));
        assert_eq!(scorer.score(&personalized, &ctx).lane, Lane::Personalized);

        // Recent with high velocity trends
        let trending = RecipeCandidate::new("r2", "stranger", now - Duration::hours(3))
            .with_engagement(500, 100, 50, 10_000);
        assert_eq!(scorer.score(&trending, &ctx).lane, Lane::Trending);

        // Followed creator without strong signals
        let following = RecipeCandidate::new("r3", "chef", now - Duration::days(10));
        assert_eq!(scorer.score(&following, &ctx).lane, Lane::Following);

        // Everything else lands in discovery
        let discovery = RecipeCandidate::new("r4", "stranger", now - Duration::days(10));
        assert_eq!(scorer.score(&discovery, &ctx).lane, Lane::Discovery);
    }

    #[test]
    fn test_score_batch_annotates_matches() {
        let now = Utc::now();
        let followed = HashSet::new();
        let mut matches = HashMap::new();
        matches.insert(
            "r1".to_string(),
            MatchResult {
                match_percentage: 50,
                matched_ingredients: vec!["salt".to_string()],
                missing_ingredients: vec!["flour".to_string()],
            },
        );
        let ctx = ScoringContext {
            now,
            followed_creators: &followed,
            pantry_matches: Some(&matches),
        };
        let profile = BehaviorProfile::default_for_new_user(0);

        let candidates = vec![
            RecipeCandidate::new("r1", "u", now),
            RecipeCandidate::new("r2", "u", now),
        ];
        let scored = scorer().score_batch(candidates, &profile, &ctx);

        assert_eq!(scored.len(), 2);
        let r1 = scored.iter().find(|s| s.candidate.id == "r1").unwrap();
        let r2 = scored.iter().find(|s| s.candidate.id == "r2").unwrap();
        assert_eq!(r1.match_result.as_ref().unwrap().match_percentage, 50);
        assert!(r2.match_result.is_none());
    }
}
