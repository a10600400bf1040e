//! Plain-text screen renderers.
//!
//! Screens are pure functions of store state: they render what the stores
//! hold and name the actions the engine says are enabled, nothing more.
//! Each screen isolates its own error state - a failed load renders as an
//! error line and recovers by navigating away and back.

use std::fmt::Write;

use campus_api::types::Course;
use campus_notify::NotificationFeed;
use campus_progress::{quiz_gate, CourseRoom, Phase, QuizGate, RatingStage};

use crate::routes::{NavState, Route};

// ============================================================================
// Progress screen
// ============================================================================

/// Renders the course-progress screen: stage sidebar, active-stage body,
/// and the certification rating prompt when one is due.
pub struct ProgressScreen<'a> {
    room: &'a CourseRoom,
    rating: Option<RatingStage>,
}

impl<'a> ProgressScreen<'a> {
    /// Creates a renderer over a room.
    #[must_use]
    pub const fn new(room: &'a CourseRoom) -> Self {
        Self { room, rating: None }
    }

    /// Attaches the rating-prompt state shown in the certification stage.
    #[must_use]
    pub const fn with_rating(mut self, rating: RatingStage) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Renders the screen.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        let Some(progress) = self.room.progress() else {
            let _ = writeln!(output, "Loading course progress...");
            return output;
        };

        let _ = writeln!(output, "# {}\n", progress.course.title);

        self.write_sidebar(&mut output);
        self.write_body(&mut output);

        output
    }

    /// Writes the five-stage sidebar with lock and expansion markers.
    fn write_sidebar(&self, output: &mut String) {
        let Some(progress) = self.room.progress() else {
            return;
        };

        let _ = writeln!(output, "## Stages\n");
        for phase in Phase::ALL {
            let line = stage_line(
                phase,
                phase == self.room.phase(),
                phase.is_reachable(progress),
            );
            let _ = writeln!(output, "{line}");
            if self.room.expanded_phases().contains(&phase) {
                for (index, lecture) in phase.lectures(progress).iter().enumerate() {
                    let watched = if progress.has_watched(&lecture.id) {
                        "x"
                    } else {
                        " "
                    };
                    let _ = writeln!(output, "    [{watched}] {}. {}", index + 1, lecture.title);
                }
            }
        }
        let _ = writeln!(output);
    }

    /// Writes the body for the active stage.
    fn write_body(&self, output: &mut String) {
        let Some(progress) = self.room.progress() else {
            return;
        };
        let phase = self.room.phase();

        let _ = writeln!(output, "## {}\n", phase.title());

        if phase.is_lecture() {
            let lectures = phase.lectures(progress);
            match self.room.current_lecture() {
                Some(lecture) => {
                    let _ = writeln!(
                        output,
                        "Lecture {} of {}: {}",
                        self.room.lecture_index() + 1,
                        lectures.len(),
                        lecture.title
                    );
                    let _ = writeln!(output, "Video: {}", lecture.video_path);
                }
                None => {
                    let _ = writeln!(output, "No lectures in this stage yet.");
                }
            }
        } else if phase.is_quiz() {
            match quiz_gate(progress, phase) {
                Some(QuizGate::Start { quiz_id }) => {
                    let _ = writeln!(output, "[Start Quiz] -> quiz {quiz_id}");
                }
                Some(QuizGate::Passed { score }) => {
                    let _ = writeln!(
                        output,
                        "Passed with {score:.0}% (passing score {:.0}%)",
                        progress.course.passing_score
                    );
                }
                Some(QuizGate::Failed { score, .. }) => {
                    let _ = writeln!(
                        output,
                        "Failed with {score:.0}% (passing score {:.0}%)",
                        progress.course.passing_score
                    );
                    let _ = writeln!(output, "[Retake Quiz]");
                }
                None => {
                    let _ = writeln!(output, "No quiz authored for this stage yet.");
                }
            }
        } else {
            let _ = writeln!(output, "Certificate awarded. Congratulations!");
            match self.rating {
                Some(RatingStage::CourseRating) => {
                    let _ = writeln!(output, "[Rate this course] (1-5 stars)");
                }
                Some(RatingStage::TutorRating) => {
                    let _ = writeln!(output, "[Rate your tutor] (1-5 stars)");
                }
                Some(RatingStage::Complete) | None => {}
            }
        }
    }
}

/// Formats one sidebar stage line.
#[must_use]
pub fn stage_line(phase: Phase, active: bool, unlocked: bool) -> String {
    let marker = if active { '>' } else { ' ' };
    let lock = if unlocked { "" } else { "  [locked]" };
    format!("{marker} {}. {}{lock}", phase.index(), phase.title())
}

/// The navigation the active quiz stage's single action performs, if that
/// action is "Start Quiz".
#[must_use]
pub fn quiz_navigation(room: &CourseRoom) -> Option<(Route, NavState)> {
    let progress = room.progress()?;
    let phase = room.phase();

    match quiz_gate(progress, phase)? {
        QuizGate::Start { quiz_id } => Some((
            Route::Quiz {
                course_id: room.course_id().to_string(),
                quiz_id,
            },
            NavState::into_quiz(phase),
        )),
        QuizGate::Passed { .. } | QuizGate::Failed { .. } => None,
    }
}

// ============================================================================
// Catalog screen
// ============================================================================

/// Renders the course catalog under its active filter.
pub struct CatalogScreen<'a> {
    courses: &'a [Course],
}

impl<'a> CatalogScreen<'a> {
    /// Creates a renderer over a fetched course list.
    #[must_use]
    pub const fn new(courses: &'a [Course]) -> Self {
        Self { courses }
    }

    /// Renders the screen.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "# Courses\n");

        if self.courses.is_empty() {
            let _ = writeln!(output, "No courses match the current filter.");
            return output;
        }

        for course in self.courses {
            let _ = writeln!(
                output,
                "- {} [{}] ${:.2} ({} + {} lectures)",
                course.title,
                course.category,
                course.price,
                course.beginner_lectures.len(),
                course.advanced_lectures.len(),
            );
        }
        output
    }
}

// ============================================================================
// Notifications screen
// ============================================================================

/// Renders the notification list, newest first.
pub struct NotificationsScreen<'a> {
    feed: &'a NotificationFeed,
}

impl<'a> NotificationsScreen<'a> {
    /// Creates a renderer over the feed.
    #[must_use]
    pub const fn new(feed: &'a NotificationFeed) -> Self {
        Self { feed }
    }

    /// Renders the screen.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "# Notifications ({} unread)\n",
            self.feed.unread_count()
        );

        if self.feed.items().is_empty() {
            let _ = writeln!(output, "Nothing yet.");
            return output;
        }

        for item in self.feed.items() {
            let marker = if item.read { ' ' } else { '*' };
            let _ = writeln!(
                output,
                "{marker} {} ({})",
                item.message,
                item.created_at.format("%Y-%m-%d %H:%M")
            );
        }
        output
    }
}

// ============================================================================
// Tests
// ============================================================================
