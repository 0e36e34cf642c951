//! Data models for the vocabulary tracker

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scheduler::SchedulerConfig;

/// Separator joining multiple senses stored in a single definition
pub const SENSE_SEPARATOR: &str = "; ";

/// A single vocabulary entry with its review scheduling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    /// The word or phrase being learned (case preserved)
    pub word: String,
    /// Meaning, translation, or note; multiple senses joined by `SENSE_SEPARATOR`
    pub definition: String,
    /// Optional example sentence (empty when absent)
    #[serde(default)]
    pub context: String,
    /// When the entry was captured
    pub created_at: DateTime<Utc>,
    /// When the entry is next due for review
    pub due_at: DateTime<Utc>,
    /// Current review spacing in whole seconds
    pub interval_secs: i64,
    /// Total number of graded reviews
    #[serde(default)]
    pub review_count: u32,
    /// Consecutive remembered outcomes since the last lapse
    #[serde(default)]
    pub streak: u32,
    /// Growth factor applied to the interval on success
    #[serde(default = "default_ease")]
    pub ease: f32,
}

fn default_ease() -> f32 {
    1.3
}

impl WordRecord {
    /// Build a fresh record that is due immediately, seeded from `config`.
    ///
    /// Callers normally go through `VocabStore::add`, which trims and
    /// validates the text fields and enforces word uniqueness first.
    pub fn new(
        word: String,
        definition: String,
        context: String,
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            word,
            definition,
            context,
            created_at: now,
            due_at: now,
            interval_secs: config.min_interval.num_seconds(),
            review_count: 0,
            streak: 0,
            ease: config.initial_ease,
        }
    }

    /// Current review spacing as a duration
    pub fn interval(&self) -> Duration {
        Duration::seconds(self.interval_secs)
    }

    /// Whether the record is due for review at `now` (boundary inclusive)
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_at
    }

    /// Individual senses of the definition
    pub fn senses(&self) -> impl Iterator<Item = &str> {
        self.definition.split(SENSE_SEPARATOR)
    }
}

/// Direction of prompting during a review session.
///
/// Affects only what the caller shows and asks for; grading always feeds the
/// same outcome enumeration to the scheduler regardless of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizMode {
    /// Show the word, ask for the definition
    WordToDefinition,
    /// Show the definition, ask for the word
    DefinitionToWord,
}

impl Default for QuizMode {
    fn default() -> Self {
        Self::WordToDefinition
    }
}

/// Outcome of prompting the user for one word.
///
/// Presentation layers convert their raw input (y/n/q keys, form fields)
/// into this enumeration exactly once; the session and scheduler never see
/// raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The user recalled the word
    Remembered,
    /// The user failed to recall the word
    Forgotten,
    /// The user ended the sitting
    Quit,
}

impl ReviewOutcome {
    /// The boolean the scheduler consumes, or `None` for `Quit`
    pub fn as_remembered(self) -> Option<bool> {
        match self {
            Self::Remembered => Some(true),
            Self::Forgotten => Some(false),
            Self::Quit => None,
        }
    }
}
