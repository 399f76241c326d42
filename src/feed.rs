//! # Discovery Engine Surface
//!
//! The request-facing facade: assembles the per-request snapshot from the
//! data provider and runs the pipeline normalize -> match -> profile ->
//! score -> rank. The engine is stateless per request; nothing here
//! mutates shared state, so concurrent requests never interfere.
//!
//! Degradation policy: auxiliary fetches (pantry, interaction history,
//! follow graph) degrade to empty defaults on transient failure so one
//! flaky dependency cannot blank the whole feed; only the candidate pool
//! fetch and invalid requests surface errors to the caller.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::behavior::{self, BehaviorProfile, DEFAULT_WINDOW_DAYS};
use crate::config::EngineConfig;
use crate::errors::DiscoveryError;
use crate::pantry_match::{self, MatchResult};
use crate::provider::DataProvider;
use crate::scoring::{CandidateScorer, ScoredCandidate, ScoringContext};
use crate::selector;
use crate::weights::{TimeContext, WeightProfile};

/// Parameters of one feed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRequest {
    pub user_id: String,
    /// Explicit time context; derived from the current hour when absent
    pub time_context: Option<TimeContext>,
    /// Session-stable seed for jitter; same seed, same ordering
    pub session_seed: u64,
    pub offset: usize,
    pub limit: usize,
    /// When set, candidates are annotated with pantry match results
    pub pantry_aware: bool,
}

impl FeedRequest {
    pub fn new(user_id: &str, session_seed: u64, offset: usize, limit: usize) -> Self {
        Self {
            user_id: user_id.to_string(),
            time_context: None,
            session_seed,
            offset,
            limit,
            pantry_aware: false,
        }
    }

    pub fn with_time_context(mut self, context: TimeContext) -> Self {
        self.time_context = Some(context);
        self
    }

    pub fn pantry_aware(mut self) -> Self {
        self.pantry_aware = true;
        self
    }
}

/// One page of ranked results plus the context that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<ScoredCandidate>,
    /// Time context the weight profile was selected for
    pub time_context: TimeContext,
    /// Weight profile actually applied (telemetry/diagnostics)
    pub weight_profile: WeightProfile,
    /// Behavior profile the request was ranked under
    pub profile: BehaviorProfile,
}

/// The discovery engine: ranking and pantry matching over a data provider
#[derive(Debug)]
pub struct DiscoveryEngine<P: DataProvider> {
    provider: P,
    config: EngineConfig,
    scorer: CandidateScorer,
}

impl<P: DataProvider> DiscoveryEngine<P> {
    /// Build an engine, validating configuration up front
    ///
    /// An invalid weight or threshold table fails here, immediately;
    /// requests never run against silently-patched weights.
    pub fn new(provider: P, config: EngineConfig) -> Result<Self, DiscoveryError> {
        config.validate()?;
        let scorer = CandidateScorer::new(config.scoring.clone());
        Ok(Self {
            provider,
            config,
            scorer,
        })
    }

    /// Assemble and rank one feed page at the current instant
    pub async fn get_feed_page(&self, request: &FeedRequest) -> Result<FeedPage, DiscoveryError> {
        self.get_feed_page_at(request, Utc::now()).await
    }

    /// Assemble and rank one feed page against an explicit timestamp
    ///
    /// Ranking is deterministic for a fixed (snapshot, seed, timestamp)
    /// triple; callers that need reproducible orderings pin the timestamp.
    pub async fn get_feed_page_at(
        &self,
        request: &FeedRequest,
        now: chrono::DateTime<Utc>,
    ) -> Result<FeedPage, DiscoveryError> {
        if request.user_id.trim().is_empty() {
            return Err(DiscoveryError::BadRequest("user_id must not be empty".into()));
        }

        let time_context = request
            .time_context
            .unwrap_or_else(|| TimeContext::from_timestamp(now));

        let pool = self.provider.fetch_eligible_recipes().await?;
        // Upstream filters exclude AI-generated recipes; re-check here so a
        // misbehaving provider cannot leak them into the community feed.
        let before = pool.len();
        let candidates: Vec<_> = pool.into_iter().filter(|c| !c.is_ai_generated).collect();
        if candidates.len() < before {
            warn!(
                dropped = before - candidates.len(),
                "provider returned AI-generated candidates, dropped"
            );
        }

        let profile = self.build_profile(&request.user_id, now).await;

        if candidates.is_empty() {
            debug!(user = %request.user_id, "empty candidate pool, returning empty page");
            return Ok(FeedPage {
                items: Vec::new(),
                time_context,
                weight_profile: self.config.weights.select(time_context, profile.engagement_score),
                profile,
            });
        }

        let pantry_matches: Option<HashMap<String, MatchResult>> = if request.pantry_aware {
            let pantry = match self.provider.fetch_pantry(&request.user_id).await {
                Ok(pantry) => pantry,
                Err(err) => {
                    warn!(user = %request.user_id, error = %err, "pantry fetch failed, degrading to empty pantry");
                    Vec::new()
                }
            };
            Some(pantry_match::compute_match_batch(&candidates, &pantry))
        } else {
            None
        };

        let followed = match self.provider.fetch_followed_creators(&request.user_id).await {
            Ok(followed) => followed,
            Err(err) => {
                warn!(user = %request.user_id, error = %err, "follow graph fetch failed, degrading to empty set");
                Default::default()
            }
        };

        let ctx = ScoringContext {
            now,
            followed_creators: &followed,
            pantry_matches: pantry_matches.as_ref(),
        };
        let scored = self.scorer.score_batch(candidates, &profile, &ctx);

        let weight_profile = self
            .config
            .weights
            .select(time_context, profile.engagement_score);
        let items = selector::rank(
            scored,
            &weight_profile,
            &self.config.selector,
            request.offset,
            request.limit,
            request.session_seed,
        );

        info!(
            user = %request.user_id,
            context = ?time_context,
            returned = items.len(),
            "feed page ranked"
        );

        Ok(FeedPage {
            items,
            time_context,
            weight_profile,
            profile,
        })
    }

    /// Pantry match for a single recipe detail view
    pub async fn get_pantry_match(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> Result<MatchResult, DiscoveryError> {
        if user_id.trim().is_empty() || recipe_id.trim().is_empty() {
            return Err(DiscoveryError::BadRequest(
                "user_id and recipe_id must not be empty".into(),
            ));
        }

        let recipe = self
            .provider
            .fetch_recipe(recipe_id)
            .await?
            .ok_or_else(|| DiscoveryError::BadRequest(format!("unknown recipe '{recipe_id}'")))?;

        let pantry = match self.provider.fetch_pantry(user_id).await {
            Ok(pantry) => pantry,
            Err(err) => {
                warn!(user = %user_id, error = %err, "pantry fetch failed, degrading to empty pantry");
                Vec::new()
            }
        };

        Ok(pantry_match::compute_match(&recipe.ingredients, &pantry))
    }

    /// Behavior profile with history fetches degraded to priors on failure
    async fn build_profile(&self, user_id: &str, now: chrono::DateTime<Utc>) -> BehaviorProfile {
        let events = match self
            .provider
            .fetch_interactions(user_id, DEFAULT_WINDOW_DAYS)
            .await
        {
            Ok(events) => events,
            Err(err) => {
                warn!(user = %user_id, error = %err, "interaction fetch failed, using prior profile");
                Vec::new()
            }
        };
        let following_count = self
            .provider
            .fetch_following_count(user_id)
            .await
            .unwrap_or(0);

        behavior::build_profile(&events, following_count, now)
    }
}
