//! # Behavior Profile Builder
//!
//! Aggregates a user's interaction history over a trailing window into a
//! compact profile used to bias ranking. Users with no history get prior
//! defaults rather than a special case: the ranking pipeline has no
//! "no profile" branch, so every user must receive a fully-populated
//! profile.

use chrono::{DateTime, Duration, Utc};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::candidate_model::{InteractionEvent, InteractionKind};

/// Trailing window length for interaction aggregation
pub const DEFAULT_WINDOW_DAYS: i64 = 90;
/// Like-rate prior for users with no in-window history
pub const LIKE_RATE_PRIOR: f64 = 0.1;
/// Save-rate prior for users with no in-window history
pub const SAVE_RATE_PRIOR: f64 = 0.05;
/// Upper bound on the engagement score
pub const ENGAGEMENT_SCORE_CAP: f64 = 10.0;

// Comment count at which normalized comment frequency saturates
const COMMENT_FREQUENCY_SCALE: f64 = 30.0;

/// Compact per-user behavior summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// Fraction of in-window interactions that were likes
    pub like_rate: f64,
    /// Fraction of in-window interactions that were saves
    pub save_rate: f64,
    /// Number of comments in the window
    pub comment_frequency: f64,
    /// Creators the user follows
    pub following_count: u32,
    /// Bounded composite engagement signal, 0 to `ENGAGEMENT_SCORE_CAP`
    pub engagement_score: f64,
}

impl BehaviorProfile {
    /// Prior-default profile for a user with no observed history
    pub fn default_for_new_user(following_count: u32) -> Self {
        Self {
            like_rate: LIKE_RATE_PRIOR,
            save_rate: SAVE_RATE_PRIOR,
            comment_frequency: 0.0,
            following_count,
            engagement_score: engagement_score(LIKE_RATE_PRIOR, SAVE_RATE_PRIOR, 0.0),
        }
    }
}

/// Build a profile from interaction history over the default 90-day window
pub fn build_profile(
    events: &[InteractionEvent],
    following_count: u32,
    now: DateTime<Utc>,
) -> BehaviorProfile {
    build_profile_with_window(events, following_count, now, DEFAULT_WINDOW_DAYS)
}

/// Build a profile over an explicit trailing window
pub fn build_profile_with_window(
    events: &[InteractionEvent],
    following_count: u32,
    now: DateTime<Utc>,
    window_days: i64,
) -> BehaviorProfile {
    let cutoff = now - Duration::days(window_days);

    let mut likes = 0u64;
    let mut saves = 0u64;
    let mut comments = 0u64;
    let mut total = 0u64;

    for event in events {
        if event.occurred_at < cutoff || event.occurred_at > now {
            continue;
        }
        total += 1;
        match event.kind {
            InteractionKind::Like => likes += 1,
            InteractionKind::Save => saves += 1,
            InteractionKind::Comment => comments += 1,
            InteractionKind::View => {}
        }
    }

    if total == 0 {
        trace!("No in-window interactions, using prior profile");
        return BehaviorProfile::default_for_new_user(following_count);
    }

    let like_rate = likes as f64 / total as f64;
    let save_rate = saves as f64 / total as f64;
    let comment_frequency = comments as f64;

    BehaviorProfile {
        like_rate,
        save_rate,
        comment_frequency,
        following_count,
        engagement_score: engagement_score(like_rate, save_rate, comment_frequency),
    }
}

fn engagement_score(like_rate: f64, save_rate: f64, comment_frequency: f64) -> f64 {
    let normalized_comments = (comment_frequency / COMMENT_FREQUENCY_SCALE).min(1.0);
    (like_rate + save_rate * 3.0 + normalized_comments).min(ENGAGEMENT_SCORE_CAP)
}
