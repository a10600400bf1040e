//! Error types for the progress engine.

use crate::phase::Phase;
use crate::playback::PlaybackState;

/// A specialized `Result` type for progress-engine operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors produced while driving the course-progress screen.
///
/// Validation variants fire before any request is sent; API failures pass
/// through with the server's message intact. None of these are fatal to the
/// application - each screen isolates its own error state.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// An underlying API call failed.
    #[error(transparent)]
    Api(#[from] campus_api::ApiError),

    /// The active stage has no current lecture (quiz and certification
    /// stages have none).
    #[error("No lecture is active in the {phase} stage")]
    NoActiveLecture {
        /// The stage that was active.
        phase: Phase,
    },

    /// The progress snapshot has not been loaded yet.
    #[error("Course progress has not been loaded")]
    NotLoaded,

    /// A stage beyond the derived one was selected from the sidebar.
    #[error("The {phase} stage is still locked")]
    StageLocked {
        /// The locked stage.
        phase: Phase,
    },

    /// A star selection outside 1-5 was rejected before any request.
    #[error("Select between 1 and 5 stars")]
    StarsOutOfRange {
        /// The rejected selection.
        given: u8,
    },

    /// The tutor rating was attempted before the course rating succeeded.
    #[error("Rate the course before rating the tutor")]
    CourseRatingPending,

    /// The rating in question was already submitted.
    #[error("This rating was already submitted")]
    AlreadyRated,

    /// The quiz was already submitted in this session.
    #[error("This quiz was already submitted")]
    AlreadySubmitted,

    /// Retake requested without a failed submission to retake.
    #[error("There is no failed attempt to retake")]
    RetakeUnavailable,

    /// An answer referenced a question or option that does not exist.
    #[error("Question {question} has no option {option}")]
    AnswerOutOfRange {
        /// Question index.
        question: usize,
        /// Option index.
        option: usize,
    },

    /// Invalid playback transition.
    #[error("Invalid playback transition: {from} -> {to}")]
    PlaybackTransition {
        /// Current state.
        from: PlaybackState,
        /// Attempted target state.
        to: PlaybackState,
    },

    /// Note creation attempted while a quiz stage (no current lecture) is
    /// active.
    #[error("Notes need an active lecture; the {phase} stage has none")]
    NoteWithoutLecture {
        /// The stage that was active.
        phase: Phase,
    },
}

impl ProgressError {
    /// Returns `true` if this is a client-side validation failure that never
    /// produced a request.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::StarsOutOfRange { .. }
                | Self::AnswerOutOfRange { .. }
                | Self::NoteWithoutLecture { .. }
                | Self::NoActiveLecture { .. }
        )
    }
}
