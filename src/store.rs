//! Persistent store for vocabulary records
//!
//! All records live in a single JSON document. The store reads the whole
//! document at open, keeps the collection in memory and rewrites the whole
//! document on every mutation using an atomic write-to-temp-then-rename, so
//! a crash mid-write can never truncate or corrupt the live file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::WordRecord;
use crate::scheduler::{SchedulerConfig, MAX_INTERVAL_SECS};

/// Version of the on-disk document format
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage file {path:?} is corrupted ({reason}); fix it or move it aside")]
    Corrupt { path: PathBuf, reason: String },

    #[error("storage file version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("word already exists: {0}")]
    DuplicateWord(String),

    #[error("word not found: {0}")]
    NotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Ordering for `VocabStore::list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Soonest due first
    DueAt,
    /// Oldest first
    CreatedAt,
}

impl Default for ListOrder {
    fn default() -> Self {
        Self::DueAt
    }
}

/// On-disk document wrapping the full collection
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VocabDocument {
    version: u32,
    words: Vec<WordRecord>,
}

/// Single source of truth for all vocabulary records, backed by one JSON
/// document.
///
/// Mutating operations take `&mut self`, so the read-modify-persist critical
/// section is exclusive by construction; share a store across threads behind
/// a `Mutex`. Every mutation persists the whole document before it becomes
/// visible in memory, so a failed persist leaves both the file and the store
/// exactly as they were.
pub struct VocabStore {
    path: PathBuf,
    config: SchedulerConfig,
    words: Vec<WordRecord>,
}

impl VocabStore {
    /// Open the store at `path`, creating the parent directory if needed.
    ///
    /// A missing file means an empty collection. An existing file that does
    /// not parse as a valid document is fatal; callers decide whether to
    /// back it up and start over.
    pub fn open(path: impl Into<PathBuf>, config: SchedulerConfig) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let words = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let document: VocabDocument =
                serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

            if document.version > DOCUMENT_VERSION {
                return Err(StoreError::UnsupportedVersion {
                    found: document.version,
                    supported: DOCUMENT_VERSION,
                });
            }

            validate_records(&document.words).map_err(|reason| StoreError::Corrupt {
                path: path.clone(),
                reason,
            })?;
            document.words
        } else {
            Vec::new()
        };

        log::debug!("Loaded {} words from {:?}", words.len(), path);
        Ok(Self {
            path,
            config,
            words,
        })
    }

    /// Location of the durable document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scheduling constants used to seed new records
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add a new word, due immediately.
    ///
    /// Trims all text inputs. Fails with `Validation` when the word or
    /// definition is empty after trimming and with `DuplicateWord` when the
    /// word is already present (case-insensitive). The record is persisted
    /// before it becomes visible to reads.
    pub fn add(
        &mut self,
        word: &str,
        definition: &str,
        context: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<WordRecord> {
        let word = word.trim();
        let definition = definition.trim();
        let context = context.unwrap_or_default().trim();

        if word.is_empty() {
            return Err(StoreError::Validation("word must not be empty".to_string()));
        }
        if definition.is_empty() {
            return Err(StoreError::Validation(
                "definition must not be empty".to_string(),
            ));
        }
        if self.find_by_word(word).is_some() {
            return Err(StoreError::DuplicateWord(word.to_string()));
        }

        let record = WordRecord::new(
            word.to_string(),
            definition.to_string(),
            context.to_string(),
            now,
            &self.config,
        );

        let mut next = self.words.clone();
        next.push(record.clone());
        self.commit(next)?;

        log::info!("Added word '{}', due {}", record.word, record.due_at);
        Ok(record)
    }

    /// Get a record by id
    pub fn get(&self, id: Uuid) -> Result<WordRecord> {
        self.words
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// All records ordered by the requested key, ascending, ties broken by
    /// id; `limit` caps the result when given.
    pub fn list(&self, order: ListOrder, limit: Option<usize>) -> Vec<WordRecord> {
        let mut records = self.words.clone();
        match order {
            ListOrder::DueAt => records.sort_by_key(|r| (r.due_at, r.id)),
            ListOrder::CreatedAt => records.sort_by_key(|r| (r.created_at, r.id)),
        }
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        records
    }

    /// Records due at `now` (boundary inclusive), soonest first, ties broken
    /// by id so the order is deterministic and stable.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<WordRecord> {
        let mut due: Vec<WordRecord> = self
            .words
            .iter()
            .filter(|r| r.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|r| (r.due_at, r.id));
        due
    }

    /// Replace the stored record with the same id.
    ///
    /// Trims the text fields the same way `add` does before validating and
    /// storing. This is the sole mutation path for scheduling state. The
    /// replacement is persisted before it becomes visible to reads; on
    /// failure the store is unchanged.
    pub fn update(&mut self, record: &WordRecord) -> Result<()> {
        let mut record = record.clone();
        record.word = record.word.trim().to_string();
        record.definition = record.definition.trim().to_string();
        record.context = record.context.trim().to_string();

        if record.word.is_empty() {
            return Err(StoreError::Validation("word must not be empty".to_string()));
        }
        if record.definition.is_empty() {
            return Err(StoreError::Validation(
                "definition must not be empty".to_string(),
            ));
        }

        let key = record.word.to_lowercase();
        if self
            .words
            .iter()
            .any(|r| r.id != record.id && r.word.to_lowercase() == key)
        {
            return Err(StoreError::DuplicateWord(record.word.clone()));
        }

        let position = self
            .words
            .iter()
            .position(|r| r.id == record.id)
            .ok_or(StoreError::NotFound(record.id))?;

        let mut next = self.words.clone();
        next[position] = record.clone();
        self.commit(next)?;

        log::debug!("Updated word '{}', next review {}", record.word, record.due_at);
        Ok(())
    }

    /// Case-insensitive lookup used for duplicate detection
    fn find_by_word(&self, word: &str) -> Option<&WordRecord> {
        let key = word.trim().to_lowercase();
        self.words.iter().find(|r| r.word.to_lowercase() == key)
    }

    /// Persist `words` as the whole document, then swap it in as the
    /// in-memory state.
    ///
    /// The document is serialized fully in memory first, written to a
    /// temporary file next to the live one and renamed over it. The live
    /// document is only ever replaced by a complete, well-formed one.
    fn commit(&mut self, words: Vec<WordRecord>) -> Result<()> {
        let document = VocabDocument {
            version: DOCUMENT_VERSION,
            words,
        };
        let json = serde_json::to_string_pretty(&document)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        self.words = document.words;
        Ok(())
    }
}

/// Structural checks applied to a freshly loaded document
fn validate_records(words: &[WordRecord]) -> std::result::Result<(), String> {
    let mut ids = HashSet::new();
    let mut keys = HashSet::new();

    for record in words {
        if record.word.trim().is_empty() {
            return Err(format!("record {} has an empty word", record.id));
        }
        if record.definition.trim().is_empty() {
            return Err(format!("word '{}' has an empty definition", record.word));
        }
        if !ids.insert(record.id) {
            return Err(format!("duplicate id {}", record.id));
        }
        if !keys.insert(record.word.to_lowercase()) {
            return Err(format!("duplicate word '{}'", record.word));
        }
        if record.interval_secs <= 0 {
            return Err(format!("word '{}' has a non-positive interval", record.word));
        }
        if record.interval_secs > MAX_INTERVAL_SECS {
            return Err(format!(
                "word '{}' has an interval beyond the supported ceiling",
                record.word
            ));
        }
        if record.streak > record.review_count {
            return Err(format!(
                "word '{}' has streak {} above review count {}",
                record.word, record.streak, record.review_count
            ));
        }
        if record.ease <= 0.0 {
            return Err(format!("word '{}' has a non-positive ease", record.word));
        }
        if record.due_at < record.created_at {
            return Err(format!("word '{}' is due before its creation", record.word));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::calculate_next_review;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn create_test_store() -> (VocabStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocab.json");
        let store = VocabStore::open(path, SchedulerConfig::default()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_add_seeds_initial_state() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();

        let record = store
            .add("ephemeral", "lasting a short time", None, now)
            .unwrap();

        assert_eq!(record.word, "ephemeral");
        assert_eq!(record.definition, "lasting a short time");
        assert_eq!(record.context, "");
        assert_eq!(record.created_at, now);
        assert_eq!(record.due_at, now);
        assert_eq!(record.interval(), store.config().min_interval);
        assert_eq!(record.review_count, 0);
        assert_eq!(record.streak, 0);
        assert_eq!(record.ease, store.config().initial_ease);

        let fetched = store.get(record.id).unwrap();
        assert_eq!(fetched, record);
    }

    #[test]
    fn test_add_trims_text_fields() {
        let (mut store, _temp) = create_test_store();

        let record = store
            .add("  gloaming ", " twilight  ", Some("  the gloaming hour "), fixed_now())
            .unwrap();

        assert_eq!(record.word, "gloaming");
        assert_eq!(record.definition, "twilight");
        assert_eq!(record.context, "the gloaming hour");
    }

    #[test]
    fn test_add_rejects_empty_fields() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();

        let empty_word = store.add("   ", "a definition", None, now);
        assert!(matches!(empty_word, Err(StoreError::Validation(_))));

        let empty_definition = store.add("word", "   ", None, now);
        assert!(matches!(empty_definition, Err(StoreError::Validation(_))));

        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicate_word_any_case() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();

        store.add("Ephemeral", "lasting a short time", None, now).unwrap();

        let duplicate = store.add("ephemeral", "another definition", None, now);
        assert!(matches!(duplicate, Err(StoreError::DuplicateWord(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_unknown_id() {
        let (store, _temp) = create_test_store();
        let missing = Uuid::new_v4();

        let result = store.get(missing);
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == missing));
    }

    #[test]
    fn test_update_replaces_and_persists() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();
        let record = store.add("ubiquitous", "found everywhere", None, now).unwrap();

        let graded = calculate_next_review(&record, true, now, store.config());
        store.update(&graded).unwrap();

        let fetched = store.get(record.id).unwrap();
        assert_eq!(fetched, graded);

        let path = store.path().to_path_buf();
        let config = store.config().clone();
        drop(store);

        let reopened = VocabStore::open(path, config).unwrap();
        assert_eq!(reopened.get(record.id).unwrap(), graded);
    }

    #[test]
    fn test_update_unknown_id() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();
        let mut record = store.add("sylvan", "of the woods", None, now).unwrap();
        record.id = Uuid::new_v4();

        let result = store.update(&record);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_update_rejects_word_collision() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();
        store.add("bank", "edge of a river", None, now).unwrap();
        let mut other = store.add("shore", "land by the water", None, now).unwrap();

        other.word = "Bank".to_string();
        let result = store.update(&other);
        assert!(matches!(result, Err(StoreError::DuplicateWord(_))));
    }

    #[test]
    fn test_update_trims_text_fields() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();
        let record = store.add("foo", "a definition", None, now).unwrap();

        let mut padded = record.clone();
        padded.word = " Foo ".to_string();
        padded.definition = " a better definition ".to_string();
        store.update(&padded).unwrap();

        let stored = store.get(record.id).unwrap();
        assert_eq!(stored.word, "Foo");
        assert_eq!(stored.definition, "a better definition");

        // The renamed word still counts for duplicate detection.
        let duplicate = store.add("foo", "another definition", None, now);
        assert!(matches!(duplicate, Err(StoreError::DuplicateWord(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_orders_and_limit() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();

        let first = store.add("alpha", "first", None, now).unwrap();
        let second = store
            .add("beta", "second", None, now + Duration::hours(1))
            .unwrap();
        let third = store
            .add("gamma", "third", None, now + Duration::hours(2))
            .unwrap();

        // Push the oldest record's next review behind the others.
        let graded = calculate_next_review(&first, true, now + Duration::hours(3), store.config());
        store.update(&graded).unwrap();

        let by_due: Vec<Uuid> = store
            .list(ListOrder::DueAt, None)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(by_due, vec![second.id, third.id, first.id]);

        let by_created: Vec<Uuid> = store
            .list(ListOrder::CreatedAt, None)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(by_created, vec![first.id, second.id, third.id]);

        let limited = store.list(ListOrder::CreatedAt, Some(2));
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, first.id);
    }

    #[test]
    fn test_due_boundary_inclusive() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();

        let due_now = store.add("due-now", "exactly due", None, now).unwrap();
        let overdue = store
            .add("overdue", "well past due", None, now - Duration::days(2))
            .unwrap();
        let future = store.add("future", "not yet due", None, now).unwrap();

        let mut pushed = future.clone();
        pushed.due_at = now + Duration::seconds(1);
        store.update(&pushed).unwrap();

        let due: Vec<Uuid> = store.due(now).into_iter().map(|r| r.id).collect();
        assert_eq!(due, vec![overdue.id, due_now.id]);
    }

    #[test]
    fn test_due_ties_broken_by_id() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();

        let a = store.add("first", "one", None, now).unwrap();
        let b = store.add("second", "two", None, now).unwrap();
        let c = store.add("third", "three", None, now).unwrap();

        // All three share the same due_at, so ordering falls back to id.
        let mut expected: Vec<Uuid> = vec![a.id, b.id, c.id];
        expected.sort();

        let due: Vec<Uuid> = store.due(now).into_iter().map(|r| r.id).collect();
        assert_eq!(due, expected);
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let (mut store, _temp) = create_test_store();
        let now = fixed_now();

        let plain = store
            .add("ephemeral", "lasting a short time", None, now)
            .unwrap();
        let multi_sense = store
            .add(
                "bank",
                "edge of a river; financial institution",
                Some("we walked along the bank"),
                now + Duration::minutes(5),
            )
            .unwrap();
        let unicode = store
            .add("猫", "cat", Some("猫が好きです"), now + Duration::minutes(10))
            .unwrap();

        // Run one record through the scheduler so a fractional ease and a
        // grown interval make it into the document.
        let graded = calculate_next_review(&multi_sense, true, now + Duration::hours(1), store.config());
        store.update(&graded).unwrap();

        let path = store.path().to_path_buf();
        let config = store.config().clone();
        drop(store);

        let reopened = VocabStore::open(path, config).unwrap();
        assert_eq!(reopened.len(), 3);
        assert_eq!(reopened.get(plain.id).unwrap(), plain);
        assert_eq!(reopened.get(multi_sense.id).unwrap(), graded);
        assert_eq!(reopened.get(unicode.id).unwrap(), unicode);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("vocab.json");

        let store = VocabStore::open(path, SchedulerConfig::default()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_fails_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocab.json");

        fs::write(&path, "this is not json {{").unwrap();
        let garbage = VocabStore::open(&path, SchedulerConfig::default());
        assert!(matches!(garbage, Err(StoreError::Corrupt { .. })));

        fs::write(&path, "[1, 2, 3]").unwrap();
        let wrong_shape = VocabStore::open(&path, SchedulerConfig::default());
        assert!(matches!(wrong_shape, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_duplicate_ids_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocab.json");
        let config = SchedulerConfig::default();

        let record = WordRecord::new(
            "alpha".to_string(),
            "first".to_string(),
            String::new(),
            fixed_now(),
            &config,
        );
        let mut twin = record.clone();
        twin.word = "beta".to_string();

        let document = VocabDocument {
            version: DOCUMENT_VERSION,
            words: vec![record, twin],
        };
        fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();

        let result = VocabStore::open(&path, config);
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_newer_document_version_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocab.json");

        let document = VocabDocument {
            version: DOCUMENT_VERSION + 1,
            words: Vec::new(),
        };
        fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();

        let result = VocabStore::open(&path, SchedulerConfig::default());
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedVersion { found, .. }) if found == DOCUMENT_VERSION + 1
        ));
    }

    #[test]
    fn test_interval_beyond_ceiling_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocab.json");
        let config = SchedulerConfig::default();

        let mut record = WordRecord::new(
            "alpha".to_string(),
            "first".to_string(),
            String::new(),
            fixed_now(),
            &config,
        );

        // Exactly at the ceiling still loads.
        record.interval_secs = MAX_INTERVAL_SECS;
        let document = VocabDocument {
            version: DOCUMENT_VERSION,
            words: vec![record.clone()],
        };
        fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
        let at_ceiling = VocabStore::open(&path, config.clone()).unwrap();
        assert_eq!(at_ceiling.len(), 1);

        // One past it is rejected before any scheduling math can run.
        record.interval_secs = MAX_INTERVAL_SECS + 1;
        let document = VocabDocument {
            version: DOCUMENT_VERSION,
            words: vec![record],
        };
        fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
        let result = VocabStore::open(&path, config);
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_failed_persist_leaves_state_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocab.json");
        let mut store = VocabStore::open(&path, SchedulerConfig::default()).unwrap();

        // Block the rename target so the persist step fails.
        fs::create_dir(&path).unwrap();

        let result = store.add("ephemeral", "lasting a short time", None, fixed_now());
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(store.is_empty());
        assert!(store.due(fixed_now()).is_empty());
    }

    #[test]
    fn test_no_temp_file_left_after_persist() {
        let (mut store, _temp) = create_test_store();
        store
            .add("ephemeral", "lasting a short time", None, fixed_now())
            .unwrap();

        let tmp_path = store.path().with_extension("json.tmp");
        assert!(store.path().exists());
        assert!(!tmp_path.exists());
    }
}
