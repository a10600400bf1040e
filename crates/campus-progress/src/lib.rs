//! Campus Progress Engine
//!
//! Derives the learner's unlock stage from server-reported progress and
//! coordinates everything the course-progress screen does: lecture playback
//! and watch tracking, quiz gating, rating prompts, and notes.

pub mod error;
pub mod notes;
pub mod phase;
pub mod playback;
pub mod quiz;
pub mod rating;
pub mod room;

pub use error::{ProgressError, Result};
pub use notes::{NoteScope, NotesPanel};
pub use phase::Phase;
pub use playback::{LecturePlayback, PlaybackState, WatchPercent};
pub use quiz::{quiz_gate, QuizGate, QuizOutcome, QuizSession};
pub use rating::{RatingSequencer, RatingStage};
pub use room::{ApplyOutcome, CourseRoom, FetchTicket, LectureAdvance, Toast};
