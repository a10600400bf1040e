//! Unlock stages and their derivation from server-reported progress.
//!
//! The stage is strictly a pure function of [`CourseProgress`]: it is never
//! persisted and is recomputed on every progress refresh. Evaluation order
//! matters - the first matching rule wins - and a later stage is only ever
//! reachable once every earlier stage's completion predicate holds.

use campus_api::types::{CourseProgress, Lecture, QuizRef};

/// The learner's current unlock stage within a course.
///
/// Stages carry stable indices 0-4 and advance strictly in order:
///
/// - `BeginnerLectures` (0) -> `BeginnerQuiz` (1) -> `AdvancedLectures` (2)
///   -> `AdvancedQuiz` (3) -> `Certification` (4)
///
/// The ordering derives (`Ord`) so the expanded-stage sidebar set keeps its
/// stages in unlock order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Watching the beginner lecture list.
    #[default]
    BeginnerLectures,
    /// Beginner lectures complete; the beginner quiz gates advancement.
    BeginnerQuiz,
    /// Beginner quiz passed; watching the advanced lecture list.
    AdvancedLectures,
    /// Advanced lectures complete; the advanced quiz gates certification.
    AdvancedQuiz,
    /// Everything passed; certificate and rating prompts.
    Certification,
}

impl Phase {
    /// All stages, in unlock order.
    pub const ALL: [Self; 5] = [
        Self::BeginnerLectures,
        Self::BeginnerQuiz,
        Self::AdvancedLectures,
        Self::AdvancedQuiz,
        Self::Certification,
    ];

    /// Derives the stage from a progress snapshot. First match wins:
    ///
    /// 1. certificate awarded -> `Certification`
    /// 2. advanced lectures complete, no advanced score -> `AdvancedQuiz`
    /// 3. beginner score at or above the passing score -> `AdvancedLectures`
    /// 4. beginner lectures complete, no beginner score -> `BeginnerQuiz`
    /// 5. otherwise -> `BeginnerLectures`
    ///
    /// Total over every possible snapshot; a failing beginner score keeps
    /// the learner out of the advanced stages.
    #[must_use]
    pub fn derive(progress: &CourseProgress) -> Self {
        if progress.certificate_awarded {
            return Self::Certification;
        }
        if progress.completed_advanced_lectures && progress.advanced_quiz_score.is_none() {
            return Self::AdvancedQuiz;
        }
        if let Some(score) = progress.beginner_quiz_score {
            if score >= progress.course.passing_score {
                return Self::AdvancedLectures;
            }
        }
        if progress.completed_beginner_lectures && progress.beginner_quiz_score.is_none() {
            return Self::BeginnerQuiz;
        }
        Self::BeginnerLectures
    }

    /// Returns the stable stage index (0-4).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::BeginnerLectures => 0,
            Self::BeginnerQuiz => 1,
            Self::AdvancedLectures => 2,
            Self::AdvancedQuiz => 3,
            Self::Certification => 4,
        }
    }

    /// Looks a stage up by its index.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::BeginnerLectures),
            1 => Some(Self::BeginnerQuiz),
            2 => Some(Self::AdvancedLectures),
            3 => Some(Self::AdvancedQuiz),
            4 => Some(Self::Certification),
            _ => None,
        }
    }

    /// The stage after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::BeginnerLectures => Some(Self::BeginnerQuiz),
            Self::BeginnerQuiz => Some(Self::AdvancedLectures),
            Self::AdvancedLectures => Some(Self::AdvancedQuiz),
            Self::AdvancedQuiz => Some(Self::Certification),
            Self::Certification => None,
        }
    }

    /// Returns `true` for the lecture-watching stages.
    #[must_use]
    pub const fn is_lecture(self) -> bool {
        matches!(self, Self::BeginnerLectures | Self::AdvancedLectures)
    }

    /// Returns `true` for the quiz-gated stages.
    #[must_use]
    pub const fn is_quiz(self) -> bool {
        matches!(self, Self::BeginnerQuiz | Self::AdvancedQuiz)
    }

    /// Returns `true` if this stage is reachable under the unlock
    /// invariant: a stage opens only once every earlier stage's completion
    /// predicate holds.
    ///
    /// Distinct from [`Phase::derive`]: a failed quiz score derives the
    /// learner back to the lecture stage, but the quiz stage itself stays
    /// reachable so its retake action can be presented.
    #[must_use]
    pub fn is_reachable(self, progress: &CourseProgress) -> bool {
        let beginner_passed = progress
            .beginner_quiz_score
            .is_some_and(|score| score >= progress.course.passing_score);

        match self {
            Self::BeginnerLectures => true,
            Self::BeginnerQuiz => progress.completed_beginner_lectures,
            Self::AdvancedLectures => beginner_passed,
            Self::AdvancedQuiz => beginner_passed && progress.completed_advanced_lectures,
            Self::Certification => progress.certificate_awarded,
        }
    }

    /// Human-readable stage title for the sidebar.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::BeginnerLectures => "Beginner Lectures",
            Self::BeginnerQuiz => "Beginner Quiz",
            Self::AdvancedLectures => "Advanced Lectures",
            Self::AdvancedQuiz => "Advanced Quiz",
            Self::Certification => "Certification",
        }
    }

    /// The lecture list this stage plays, empty for quiz and certification
    /// stages.
    #[must_use]
    pub fn lectures(self, progress: &CourseProgress) -> &[Lecture] {
        match self {
            Self::BeginnerLectures => &progress.course.beginner_lectures,
            Self::AdvancedLectures => &progress.course.advanced_lectures,
            _ => &[],
        }
    }

    /// The quiz gating this stage, if it is a quiz stage.
    #[must_use]
    pub fn quiz_ref(self, progress: &CourseProgress) -> Option<&QuizRef> {
        match self {
            Self::BeginnerQuiz => progress.course.beginner_quiz.as_ref(),
            Self::AdvancedQuiz => progress.course.advanced_quiz.as_ref(),
            _ => None,
        }
    }

    /// The stored score for this stage's quiz, if it is a quiz stage with a
    /// submission.
    #[must_use]
    pub const fn quiz_score(self, progress: &CourseProgress) -> Option<f64> {
        match self {
            Self::BeginnerQuiz => progress.beginner_quiz_score,
            Self::AdvancedQuiz => progress.advanced_quiz_score,
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

// ============================================================================
// Tests
// ============================================================================
