//! # Pantry Match Calculator
//!
//! Computes how well a recipe's ingredient list overlaps with a user's
//! pantry inventory. Matching is by canonical ingredient identity only:
//! quantity sufficiency is deliberately out of scope for the percentage.
//!
//! The matched/missing sets are reported as plain canonical display names,
//! never structured objects. Downstream consumers (UI, grocery-list
//! suggestions) rely on receiving string arrays; this contract must hold
//! through serialization.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::candidate_model::RecipeCandidate;
use crate::ingredient_model::{PantryEntry, RecipeIngredient};
use crate::normalizer;

/// Result of matching one recipe against one pantry snapshot
///
/// Derived on demand per (user, recipe) pair; callers may cache, the engine
/// never persists these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Share of the recipe's ingredients present in the pantry, 0-100
    pub match_percentage: u8,
    /// Canonical names of recipe ingredients found in the pantry, in
    /// recipe order
    pub matched_ingredients: Vec<String>,
    /// Canonical names of recipe ingredients absent from the pantry, in
    /// recipe order
    pub missing_ingredients: Vec<String>,
}

impl MatchResult {
    /// An empty result: 0% with both sets empty
    pub fn empty() -> Self {
        Self {
            match_percentage: 0,
            matched_ingredients: Vec::new(),
            missing_ingredients: Vec::new(),
        }
    }
}

/// Normalize a pantry snapshot into a set of canonical names
///
/// Entries that cannot be normalized even at low confidence are skipped;
/// a bad pantry row never fails the computation.
pub fn normalize_pantry(pantry: &[PantryEntry]) -> HashSet<String> {
    pantry
        .iter()
        .filter_map(|entry| normalizer::normalize(&entry.ingredient_name, entry.quantity, &entry.unit))
        .map(|normalized| normalized.token.canonical_name)
        .collect()
}

/// Match a single recipe's ingredients against a pantry snapshot
pub fn compute_match(recipe_ingredients: &[RecipeIngredient], pantry: &[PantryEntry]) -> MatchResult {
    let pantry_names = normalize_pantry(pantry);
    match_against(recipe_ingredients, &pantry_names)
}

/// Match a pool of candidates against one pantry snapshot
///
/// The pantry is normalized exactly once; candidates are matched in
/// parallel. This is the dominant cost driver when annotating large pools,
/// so the single normalization pass matters.
pub fn compute_match_batch(
    candidates: &[RecipeCandidate],
    pantry: &[PantryEntry],
) -> HashMap<String, MatchResult> {
    let pantry_names = normalize_pantry(pantry);
    debug!(
        "Batch matching {} candidates against {} pantry tokens",
        candidates.len(),
        pantry_names.len()
    );

    candidates
        .par_iter()
        .map(|candidate| {
            (
                candidate.id.clone(),
                match_against(&candidate.ingredients, &pantry_names),
            )
        })
        .collect()
}

fn match_against(recipe_ingredients: &[RecipeIngredient], pantry_names: &HashSet<String>) -> MatchResult {
    // Recipe tokens deduplicated by canonical identity, recipe order kept
    let mut recipe_tokens: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for ingredient in recipe_ingredients {
        if let Some(normalized) =
            normalizer::normalize(&ingredient.name, ingredient.quantity, &ingredient.unit)
        {
            if seen.insert(normalized.token.canonical_name.clone()) {
                recipe_tokens.push(normalized.token.canonical_name);
            }
        }
    }

    if recipe_tokens.is_empty() {
        return MatchResult::empty();
    }

    let total = recipe_tokens.len();
    let (matched, missing): (Vec<String>, Vec<String>) = recipe_tokens
        .into_iter()
        .partition(|name| pantry_names.contains(name));

    let match_percentage = ((matched.len() as f64 / total as f64) * 100.0).round() as u8;

    MatchResult {
        match_percentage,
        matched_ingredients: matched,
        missing_ingredients: missing,
    }
}
