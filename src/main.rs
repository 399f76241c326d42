use anyhow::Result;
use chrono::{Duration, Utc};
use log::info;

use discovery::candidate_model::{InteractionEvent, InteractionKind, RecipeCandidate};
use discovery::config::EngineConfig;
use discovery::feed::{DiscoveryEngine, FeedRequest};
use discovery::ingredient_model::{PantryEntry, RecipeIngredient};
use discovery::provider::InMemoryProvider;
use discovery::weights::TimeContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting discovery engine demo");

    let now = Utc::now();
    let mut provider = InMemoryProvider::new();

    provider
        .add_recipe(
            RecipeCandidate::new("caesar-salad", "chef-anna", now - Duration::hours(3))
                .with_description("A crisp weeknight caesar with homemade croutons and plenty of parmesan.")
                .with_video("https://cdn.example/v/caesar.mp4")
                .with_ingredients(vec![
                    RecipeIngredient::new("chicken breast", 2.0, "unit"),
                    RecipeIngredient::new("romaine lettuce", 1.0, "unit"),
                    RecipeIngredient::new("croutons", 100.0, "g"),
                    RecipeIngredient::new("parmesan cheese", 50.0, "g"),
                    RecipeIngredient::new("salt", 1.0, "tsp"),
                ])
                .with_engagement(42, 15, 6, 900),
        )
        .add_recipe(
            RecipeCandidate::new("midnight-pasta", "chef-ben", now - Duration::days(4))
                .with_description("Garlic, olive oil, chili flakes. Ten minutes, start to finish.")
                .with_ingredients(vec![
                    RecipeIngredient::new("pasta", 200.0, "g"),
                    RecipeIngredient::new("garlic", 4.0, "cloves"),
                    RecipeIngredient::new("olive oil", 60.0, "ml"),
                    RecipeIngredient::new("red pepper flakes", 1.0, "tsp"),
                ])
                .with_engagement(310, 95, 40, 8000),
        )
        .add_recipe(
            RecipeCandidate::new("granola-bowl", "chef-anna", now - Duration::days(30))
                .with_description("Make-ahead breakfast granola.")
                .with_ingredients(vec![
                    RecipeIngredient::new("oats", 300.0, "g"),
                    RecipeIngredient::new("honey", 80.0, "ml"),
                    RecipeIngredient::new("almonds", 100.0, "g"),
                ])
                .with_engagement(1200, 400, 150, 50000),
        )
        .set_pantry(
            "demo-user",
            vec![
                PantryEntry::new("parmesan cheese", 200.0, "g"),
                PantryEntry::new("salt", 500.0, "g"),
                PantryEntry::new("pasta", 1.0, "kg"),
                PantryEntry::new("olive oil", 400.0, "ml"),
                PantryEntry::new("garlic", 2.0, "unit"),
            ],
        )
        .follow("demo-user", "chef-anna");

    provider.add_interaction(
        "demo-user",
        InteractionEvent::new(InteractionKind::Like, now - Duration::days(2)),
    );
    provider.add_interaction(
        "demo-user",
        InteractionEvent::new(InteractionKind::Save, now - Duration::days(5)),
    );

    let engine = DiscoveryEngine::new(provider, EngineConfig::default())?;

    let request = FeedRequest::new("demo-user", 1234, 0, 10)
        .with_time_context(TimeContext::Dinner)
        .pantry_aware();

    let page = engine.get_feed_page(&request).await?;

    info!(
        "Ranked {} candidates under {:?} weights",
        page.items.len(),
        page.time_context
    );

    println!("{}", serde_json::to_string_pretty(&page)?);

    let detail = engine.get_pantry_match("demo-user", "caesar-salad").await?;
    println!(
        "caesar-salad pantry match: {}% (missing: {})",
        detail.match_percentage,
        detail.missing_ingredients.join(", ")
    );

    Ok(())
}
