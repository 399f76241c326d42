//! Engine-level pantry match contract tests.

use chrono::Utc;

use discovery::config::EngineConfig;
use discovery::errors::DiscoveryError;
use discovery::feed::DiscoveryEngine;
use discovery::ingredient_model::{PantryEntry, RecipeIngredient};
use discovery::candidate_model::RecipeCandidate;
use discovery::provider::InMemoryProvider;

fn caesar_recipe() -> RecipeCandidate {
    RecipeCandidate::new("caesar", "chef", Utc::now()).with_ingredients(vec![
        RecipeIngredient::new("chicken breast", 2.0, "unit"),
        RecipeIngredient::new("romaine lettuce", 1.0, "unit"),
        RecipeIngredient::new("croutons", 100.0, "g"),
        RecipeIngredient::new("parmesan cheese", 50.0, "g"),
        RecipeIngredient::new("salt", 1.0, "tsp"),
    ])
}

fn engine_with(provider: InMemoryProvider) -> DiscoveryEngine<InMemoryProvider> {
    DiscoveryEngine::new(provider, EngineConfig::default()).unwrap()
}

#[tokio::test]
async fn test_single_recipe_match_through_engine() {
    let mut provider = InMemoryProvider::new();
    provider.add_recipe(caesar_recipe()).set_pantry(
        "u1",
        vec![
            PantryEntry::new("parmesan cheese", 200.0, "g"),
            PantryEntry::new("salt", 500.0, "g"),
        ],
    );

    let result = engine_with(provider)
        .get_pantry_match("u1", "caesar")
        .await
        .unwrap();

    assert_eq!(result.match_percentage, 40);
    assert_eq!(result.matched_ingredients, vec!["parmesan cheese", "salt"]);
    assert_eq!(
        result.missing_ingredients,
        vec!["chicken breast", "romaine lettuce", "croutons"]
    );
}

#[tokio::test]
async fn test_match_result_serializes_ingredient_arrays_as_strings() {
    // Downstream consumers receive plain string arrays, never objects
    let mut provider = InMemoryProvider::new();
    provider.add_recipe(caesar_recipe()).set_pantry(
        "u1",
        vec![PantryEntry::new("salt", 500.0, "g")],
    );

    let result = engine_with(provider)
        .get_pantry_match("u1", "caesar")
        .await
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    for field in ["matched_ingredients", "missing_ingredients"] {
        let array = json[field]
            .as_array()
            .unwrap_or_else(|| panic!("{field} must be an array"));
        assert!(
            array.iter().all(serde_json::Value::is_string),
            "{field} must contain only plain strings"
        );
    }
}

#[tokio::test]
async fn test_unknown_recipe_is_bad_request() {
    let engine = engine_with(InMemoryProvider::new());

    let err = engine.get_pantry_match("u1", "nope").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::BadRequest(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_empty_ids_are_bad_requests() {
    let engine = engine_with(InMemoryProvider::new());

    assert!(engine.get_pantry_match("", "caesar").await.is_err());
    assert!(engine.get_pantry_match("u1", "  ").await.is_err());
}

#[tokio::test]
async fn test_user_without_pantry_gets_zero_match() {
    let mut provider = InMemoryProvider::new();
    provider.add_recipe(caesar_recipe());

    let result = engine_with(provider)
        .get_pantry_match("pantryless", "caesar")
        .await
        .unwrap();

    assert_eq!(result.match_percentage, 0);
    assert_eq!(result.missing_ingredients.len(), 5);
    assert!(result.matched_ingredients.is_empty());
}

#[tokio::test]
async fn test_empty_ingredient_recipe_matches_zero() {
    let mut provider = InMemoryProvider::new();
    provider
        .add_recipe(RecipeCandidate::new("bare", "chef", Utc::now()))
        .set_pantry("u1", vec![PantryEntry::new("salt", 500.0, "g")]);

    let result = engine_with(provider)
        .get_pantry_match("u1", "bare")
        .await
        .unwrap();

    assert_eq!(result.match_percentage, 0);
    assert!(result.matched_ingredients.is_empty());
    assert!(result.missing_ingredients.is_empty());
}
