//! Personal vocabulary tracker with spaced-repetition scheduling.
//!
//! Words live in [`store::VocabStore`], one JSON document on disk. The pure
//! [`scheduler`] decides when a word comes back after a review, and
//! [`session::ReviewSession`] drives one sitting over the due queue. The
//! `mneme` binary is a thin shim over these modules.

pub mod models;
pub mod scheduler;
pub mod session;
pub mod store;

pub use models::{QuizMode, ReviewOutcome, WordRecord};
pub use scheduler::{calculate_next_review, SchedulerConfig};
pub use session::{ReviewSession, SessionError, SessionState};
pub use store::{ListOrder, StoreError, VocabStore};
