//! # Weighted Selector / Ranker
//!
//! Final ranking stage: blends composite scores with lane weights, applies
//! bounded seeded jitter for variety, and paginates. Repeated calls within
//! a session (same seed) produce identical orderings; different sessions
//! see different tie-breaks over the same eligible set.
//!
//! Jitter is derived from the request seed XORed with a hash of the recipe
//! id, so a candidate's noise term does not depend on pool order.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::config::SelectorConfig;
use crate::scoring::{Lane, ScoredCandidate};
use crate::weights::WeightProfile;

/// Blend weight for a lane under the selected profile
///
/// The following lane is floored at a configured minimum so content from
/// followed creators is never fully crowded out by score comparison alone.
pub fn lane_weight(lane: Lane, profile: &WeightProfile, config: &SelectorConfig) -> f64 {
    match lane {
        Lane::Personalized => profile.personalized,
        Lane::Trending => profile.trending,
        Lane::Discovery => profile.discovery,
        Lane::Following => profile.personalized.max(config.following_floor),
    }
}

/// Rank a scored pool and slice out one page
///
/// The output never contains duplicate recipe ids and never exceeds
/// `limit` items; a pool shorter than `offset + limit` yields the
/// remainder, and an empty pool yields an empty page.
pub fn rank(
    scored: Vec<ScoredCandidate>,
    profile: &WeightProfile,
    config: &SelectorConfig,
    offset: usize,
    limit: usize,
    seed: u64,
) -> Vec<ScoredCandidate> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut keyed: Vec<(f64, ScoredCandidate)> = Vec::with_capacity(scored.len());

    for candidate in scored {
        if !seen_ids.insert(candidate.candidate.id.clone()) {
            debug!("Dropping duplicate candidate id {}", candidate.candidate.id);
            continue;
        }
        let weight = lane_weight(candidate.breakdown.lane, profile, config);
        let jitter = jitter_for(&candidate.candidate.id, seed, config.jitter_range);
        let key = candidate.breakdown.composite_score * weight + jitter;
        keyed.push((key, candidate));
    }

    keyed.sort_by(|(key_a, a), (key_b, b)| {
        key_b
            .partial_cmp(key_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });

    let start = offset.min(keyed.len());
    let end = offset.saturating_add(limit).min(keyed.len());

    keyed
        .drain(..)
        .map(|(_, candidate)| candidate)
        .skip(start)
        .take(end - start)
        .collect()
}

/// Order-independent per-candidate jitter in [0, range)
fn jitter_for(recipe_id: &str, seed: u64, range: f64) -> f64 {
    if range <= 0.0 {
        return 0.0;
    }
    let mut hasher = DefaultHasher::new();
    recipe_id.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(seed ^ hasher.finish());
    rng.gen_range(0.0..range)
}
