//! # Recipe Discovery Engine
//!
//! Ranking and pantry-match engine for a recipe/pantry application:
//! decides which recipes to show a user at a given moment, and computes
//! how well each recipe's ingredient list overlaps with that user's
//! pantry inventory.
//!
//! The pipeline runs normalize -> match -> profile -> score -> rank over
//! an immutable per-request snapshot fetched through [`provider::DataProvider`].

pub mod behavior;
pub mod candidate_model;
pub mod config;
pub mod errors;
pub mod feed;
pub mod ingredient_model;
pub mod normalizer;
pub mod pantry_match;
pub mod provider;
pub mod scoring;
pub mod selector;
pub mod weights;
