//! # Recipe Candidate and Interaction Data Model
//!
//! Shapes received from the content and interaction stores. Candidates are
//! read-only to the engine; upstream filters are expected to exclude
//! AI-generated and non-public recipes, and the engine re-checks the
//! AI flag defensively before ranking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recipe eligible for ranking, with raw engagement counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    /// Stable recipe identifier
    pub id: String,
    /// Ordered ingredient list as authored
    pub ingredients: Vec<crate::ingredient_model::RecipeIngredient>,
    /// Publication timestamp
    pub created_at: DateTime<Utc>,
    /// Author identifier
    pub creator_id: String,
    /// AI-authored recipes are excluded from community feed pools by policy
    pub is_ai_generated: bool,
    /// Recipe description/body text
    pub description: String,
    /// Playable media asset, when the recipe has one
    pub video_url: Option<String>,
    pub likes: u64,
    pub saves: u64,
    pub comments: u64,
    pub views: u64,
}

impl RecipeCandidate {
    pub fn new(id: &str, creator_id: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            ingredients: Vec::new(),
            created_at,
            creator_id: creator_id.to_string(),
            is_ai_generated: false,
            description: String::new(),
            video_url: None,
            likes: 0,
            saves: 0,
            comments: 0,
            views: 0,
        }
    }

    pub fn with_ingredients(
        mut self,
        ingredients: Vec<crate::ingredient_model::RecipeIngredient>,
    ) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_video(mut self, url: &str) -> Self {
        self.video_url = Some(url.to_string());
        self
    }

    pub fn with_engagement(mut self, likes: u64, saves: u64, comments: u64, views: u64) -> Self {
        self.likes = likes;
        self.saves = saves;
        self.comments = comments;
        self.views = views;
        self
    }

    pub fn ai_generated(mut self) -> Self {
        self.is_ai_generated = true;
        self
    }

    /// Whether the recipe carries a playable media asset
    pub fn has_playable_media(&self) -> bool {
        self.video_url.is_some()
    }

    /// Recipe age in fractional hours at `now`, clamped to zero for clock skew
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let seconds = (now - self.created_at).num_seconds();
        (seconds.max(0) as f64) / 3600.0
    }
}

/// Kind of user interaction observed by the behavior profiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Save,
    Comment,
    View,
}

/// A single interaction event from the user's history window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    pub occurred_at: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn new(kind: InteractionKind, occurred_at: DateTime<Utc>) -> Self {
        Self { kind, occurred_at }
    }
}
