//! Interactive review sessions
//!
//! A session snapshots the due queue once at start and walks it one word at
//! a time. Every grade is committed to the store before the session
//! advances, so quitting partway through never loses finished reviews and
//! never leaves half-applied state behind.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{QuizMode, ReviewOutcome, WordRecord};
use crate::scheduler::{calculate_next_review, SchedulerConfig};
use crate::store::{StoreError, VocabStore};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid session state: expected {expected}, found {actual:?}")]
    InvalidState {
        /// Description of the states the call is legal in
        expected: String,
        actual: SessionState,
    },

    #[error("{0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Lifecycle of a review session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created but not started
    Idle,
    /// Words remain in the queue
    InProgress,
    /// The queue was exhausted
    Completed,
    /// Ended early; grades persisted so far remain persisted
    Aborted,
}

/// One sitting of reviews over the words due at a point in time.
///
/// The queue is fixed when the session starts; words that become due while
/// the session runs wait for the next one.
pub struct ReviewSession {
    state: SessionState,
    quiz_mode: QuizMode,
    config: SchedulerConfig,
    queue: VecDeque<WordRecord>,
    graded_count: usize,
    remembered_count: usize,
    skipped_count: usize,
}

impl ReviewSession {
    pub fn new(quiz_mode: QuizMode, config: SchedulerConfig) -> Self {
        Self {
            state: SessionState::Idle,
            quiz_mode,
            config,
            queue: VecDeque::new(),
            graded_count: 0,
            remembered_count: 0,
            skipped_count: 0,
        }
    }

    /// Snapshot the words due at `now` and begin.
    ///
    /// An empty queue completes the session immediately.
    pub fn start(&mut self, store: &VocabStore, now: DateTime<Utc>) -> Result<()> {
        self.expect_state(SessionState::Idle)?;

        self.queue = store.due(now).into();
        self.state = if self.queue.is_empty() {
            SessionState::Completed
        } else {
            SessionState::InProgress
        };

        log::debug!("Review session started with {} due words", self.queue.len());
        Ok(())
    }

    /// The word currently up for review
    pub fn current(&self) -> Result<&WordRecord> {
        self.expect_state(SessionState::InProgress)?;
        Ok(self
            .queue
            .front()
            .expect("queue is non-empty while a session is in progress"))
    }

    /// Grade the current word and commit its updated schedule.
    ///
    /// Returns the updated record, or `Ok(None)` when the outcome is `Quit`,
    /// which aborts the session without grading. A store failure leaves the
    /// queue, counters and state untouched so the caller can retry or abort.
    pub fn grade(
        &mut self,
        store: &mut VocabStore,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> Result<Option<WordRecord>> {
        self.expect_state(SessionState::InProgress)?;

        let remembered = match outcome.as_remembered() {
            Some(remembered) => remembered,
            None => {
                self.state = SessionState::Aborted;
                log::debug!("Review session aborted by quit");
                return Ok(None);
            }
        };

        let updated = calculate_next_review(self.current()?, remembered, now, &self.config);
        store.update(&updated)?;

        // The grade is durable; only now does the session move on.
        self.queue.pop_front();
        self.graded_count += 1;
        if remembered {
            self.remembered_count += 1;
        }
        if self.queue.is_empty() {
            self.state = SessionState::Completed;
        }

        Ok(Some(updated))
    }

    /// Move past the current word without grading it.
    ///
    /// Nothing is persisted; the word keeps its schedule and stays due.
    pub fn skip(&mut self) -> Result<()> {
        self.expect_state(SessionState::InProgress)?;

        self.queue.pop_front();
        self.skipped_count += 1;
        if self.queue.is_empty() {
            self.state = SessionState::Completed;
        }
        Ok(())
    }

    /// End the session early, from any non-terminal state. Grades already
    /// persisted stay persisted.
    pub fn abort(&mut self) -> Result<()> {
        match self.state {
            SessionState::Idle | SessionState::InProgress => {
                self.state = SessionState::Aborted;
                Ok(())
            }
            actual => Err(SessionError::InvalidState {
                expected: "Idle or InProgress".to_string(),
                actual,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn quiz_mode(&self) -> QuizMode {
        self.quiz_mode
    }

    /// Words graded so far in this session
    pub fn graded_count(&self) -> usize {
        self.graded_count
    }

    /// Graded words that were remembered
    pub fn remembered_count(&self) -> usize {
        self.remembered_count
    }

    /// Words passed over without grading
    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    /// Words still waiting in the queue
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected: format!("{:?}", expected),
                actual: self.state,
            })
        }
    }
}
