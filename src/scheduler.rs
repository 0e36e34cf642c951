//! Spaced-repetition scheduling for vocabulary reviews
//!
//! The update rule maps a word's current state and a recall outcome to its
//! next state:
//! - remembered: the ease factor grows (bounded by a cap) and the interval
//!   is multiplied by the updated ease, so spacing expands while a streak
//!   holds
//! - forgotten: the streak resets, the ease shrinks (bounded by a floor)
//!   and the interval drops back to the minimum so the word resurfaces soon
//!
//! `calculate_next_review` is pure: it performs no I/O and persists nothing.
//! The caller hands the result to `VocabStore::update`.

use chrono::{DateTime, Duration, Utc};

use crate::models::WordRecord;

/// Default multiplier applied to the ease factor on a remembered outcome
pub const DEFAULT_GROWTH_FACTOR: f32 = 1.3;

/// Default multiplier applied to the ease factor on a forgotten outcome
pub const DEFAULT_SHRINK_FACTOR: f32 = 0.8;

/// Default lower bound for the ease factor
pub const DEFAULT_EASE_FLOOR: f32 = 1.3;

/// Default upper bound for the ease factor
pub const DEFAULT_EASE_CAP: f32 = 2.5;

/// Ceiling for the review interval, in seconds (about a century).
///
/// Grown intervals clamp here, which keeps interval and due-date arithmetic
/// inside chrono's representable range for any grading history.
pub const MAX_INTERVAL_SECS: i64 = 100 * 365 * 86_400;

/// Tunable constants for the review scheduler.
///
/// Injected wherever scheduling happens (new-record seeding in
/// `VocabStore::add`, grading in `ReviewSession`), so nothing in the core
/// reads configuration implicitly. The defaults are conventional
/// spaced-repetition values.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Multiplier applied to `ease` on a remembered outcome (> 1)
    pub growth_factor: f32,
    /// Multiplier applied to `ease` on a forgotten outcome (< 1)
    pub shrink_factor: f32,
    /// Shortest allowed spacing; also the seed interval for new words
    pub min_interval: Duration,
    /// Lower bound for `ease`
    pub ease_floor: f32,
    /// Upper bound for `ease`
    pub ease_cap: f32,
    /// Ease assigned to freshly added words. Defaults to the floor so that
    /// consistent recall is what raises the multiplier.
    pub initial_ease: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            growth_factor: DEFAULT_GROWTH_FACTOR,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            min_interval: Duration::days(1),
            ease_floor: DEFAULT_EASE_FLOOR,
            ease_cap: DEFAULT_EASE_CAP,
            initial_ease: DEFAULT_EASE_FLOOR,
        }
    }
}

/// Apply one graded review to `record`, returning the updated record.
///
/// `review_count` increments unconditionally. A remembered outcome extends
/// the streak, grows the ease (capped) and multiplies the interval by the
/// updated ease; a forgotten outcome resets the streak, shrinks the ease
/// (floored) and resets the interval to the minimum. The new due date is
/// `now + interval`. Starting from a record within bounds, `interval` never
/// drops below `min_interval` nor exceeds `MAX_INTERVAL_SECS`, and `ease`
/// never leaves `[ease_floor, ease_cap]`.
pub fn calculate_next_review(
    record: &WordRecord,
    remembered: bool,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> WordRecord {
    // A clock earlier than the record's creation must not push due_at
    // before created_at.
    let now = now.max(record.created_at);

    let mut next = record.clone();
    next.review_count = record.review_count + 1;

    if remembered {
        next.streak = record.streak + 1;
        next.ease = (record.ease * config.growth_factor).min(config.ease_cap);
        let grown = (record.interval_secs as f64 * f64::from(next.ease)).round() as i64;
        next.interval_secs = grown
            .max(config.min_interval.num_seconds())
            .min(MAX_INTERVAL_SECS);
    } else {
        next.streak = 0;
        next.ease = (record.ease * config.shrink_factor).max(config.ease_floor);
        next.interval_secs = config.min_interval.num_seconds();
    }

    // Extreme timestamps saturate at chrono's maximum instant instead of
    // overflowing.
    next.due_at = now
        .checked_add_signed(Duration::seconds(next.interval_secs))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    next
}
