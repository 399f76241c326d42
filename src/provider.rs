//! # Data Provider Boundary
//!
//! The discovery engine treats storage as an external collaborator: all
//! inputs arrive through this trait as an immutable per-request snapshot.
//! Implementations are expected to apply upstream eligibility filters
//! (public recipes only, AI-generated excluded) before returning a pool.
//!
//! [`InMemoryProvider`] backs the demo binary and the integration tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::candidate_model::{InteractionEvent, RecipeCandidate};
use crate::errors::DiscoveryError;
use crate::ingredient_model::PantryEntry;

/// Read-only data access consumed by the engine
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Current pantry snapshot for a user; empty when the user has none
    async fn fetch_pantry(&self, user_id: &str) -> Result<Vec<PantryEntry>, DiscoveryError>;

    /// Eligible candidate pool, upstream-filtered
    async fn fetch_eligible_recipes(&self) -> Result<Vec<RecipeCandidate>, DiscoveryError>;

    /// Single recipe lookup for detail views
    async fn fetch_recipe(
        &self,
        recipe_id: &str,
    ) -> Result<Option<RecipeCandidate>, DiscoveryError>;

    /// Interaction history for the trailing window
    async fn fetch_interactions(
        &self,
        user_id: &str,
        window_days: i64,
    ) -> Result<Vec<InteractionEvent>, DiscoveryError>;

    /// Number of creators the user follows
    async fn fetch_following_count(&self, user_id: &str) -> Result<u32, DiscoveryError>;

    /// Creator ids the user follows
    async fn fetch_followed_creators(
        &self,
        user_id: &str,
    ) -> Result<HashSet<String>, DiscoveryError>;
}

/// In-memory provider for demos and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    recipes: Vec<RecipeCandidate>,
    pantries: HashMap<String, Vec<PantryEntry>>,
    interactions: HashMap<String, Vec<InteractionEvent>>,
    follows: HashMap<String, HashSet<String>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_recipe(&mut self, recipe: RecipeCandidate) -> &mut Self {
        self.recipes.push(recipe);
        self
    }

    pub fn set_pantry(&mut self, user_id: &str, pantry: Vec<PantryEntry>) -> &mut Self {
        self.pantries.insert(user_id.to_string(), pantry);
        self
    }

    pub fn add_interaction(&mut self, user_id: &str, event: InteractionEvent) -> &mut Self {
        self.interactions
            .entry(user_id.to_string())
            .or_default()
            .push(event);
        self
    }

    pub fn follow(&mut self, user_id: &str, creator_id: &str) -> &mut Self {
        self.follows
            .entry(user_id.to_string())
            .or_default()
            .insert(creator_id.to_string());
        self
    }
}

#[async_trait]
impl DataProvider for InMemoryProvider {
    async fn fetch_pantry(&self, user_id: &str) -> Result<Vec<PantryEntry>, DiscoveryError> {
        Ok(self.pantries.get(user_id).cloned().unwrap_or_default())
    }

    async fn fetch_eligible_recipes(&self) -> Result<Vec<RecipeCandidate>, DiscoveryError> {
        // Mirrors the upstream eligibility filter
        Ok(self
            .recipes
            .iter()
            .filter(|recipe| !recipe.is_ai_generated)
            .cloned()
            .collect())
    }

    async fn fetch_recipe(
        &self,
        recipe_id: &str,
    ) -> Result<Option<RecipeCandidate>, DiscoveryError> {
        Ok(self.recipes.iter().find(|r| r.id == recipe_id).cloned())
    }

    async fn fetch_interactions(
        &self,
        user_id: &str,
        _window_days: i64,
    ) -> Result<Vec<InteractionEvent>, DiscoveryError> {
        Ok(self.interactions.get(user_id).cloned().unwrap_or_default())
    }

    async fn fetch_following_count(&self, user_id: &str) -> Result<u32, DiscoveryError> {
        Ok(self.follows.get(user_id).map(|f| f.len() as u32).unwrap_or(0))
    }

    async fn fetch_followed_creators(
        &self,
        user_id: &str,
    ) -> Result<HashSet<String>, DiscoveryError> {
        Ok(self.follows.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_in_memory_provider_round_trip() {
        let now = Utc::now();
        let mut provider = InMemoryProvider::new();
        provider
            .add_recipe(RecipeCandidate::new("r1", "chef", now))
            .set_pantry("u1", vec![PantryEntry::new("salt", 500.0, "g")])
            .follow("u1", "chef");

        assert_eq!(provider.fetch_eligible_recipes().await.unwrap().len(), 1);
        assert_eq!(provider.fetch_pantry("u1").await.unwrap().len(), 1);
        assert!(provider.fetch_pantry("stranger").await.unwrap().is_empty());
        assert_eq!(provider.fetch_following_count("u1").await.unwrap(), 1);
        assert!(provider
            .fetch_followed_creators("u1")
            .await
            .unwrap()
            .contains("chef"));
        assert!(provider.fetch_recipe("r1").await.unwrap().is_some());
        assert!(provider.fetch_recipe("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ai_generated_recipes_are_filtered_upstream() {
        let now = Utc::now();
        let mut provider = InMemoryProvider::new();
        provider
            .add_recipe(RecipeCandidate::new("human", "chef", now))
            .add_recipe(RecipeCandidate::new("bot", "chef", now).ai_generated());

        let pool = provider.fetch_eligible_recipes().await.unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, "human");
    }
}
