//! Wire types for the Campus LMS API.
//!
//! Everything in this module mirrors the JSON shapes the server produces.
//! Field names are camelCase on the wire; ids are opaque server-assigned
//! strings (`_id` in the payloads). Derived, client-only values such as the
//! unlock phase live in `campus-progress`, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Users and roles
// ============================================================================

/// Role attached to an authenticated account.
///
/// Roles gate route visibility and the tutor/admin dashboards; the server is
/// the authority, the client only mirrors the value it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator: full catalog and assignment control.
    Admin,
    /// Tutor: manages assigned courses and answers learners.
    Tutor,
    /// Learner enrolled in courses.
    Student,
}

impl Role {
    /// Returns `true` for roles with management surfaces (admin, tutor).
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Tutor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Tutor => write!(f, "tutor"),
            Self::Student => write!(f, "student"),
        }
    }
}

/// An authenticated account as reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sign-in email.
    pub email: String,
    /// Access role.
    pub role: Role,
    /// Whether the email address has been verified.
    #[serde(default)]
    pub verified: bool,
}

/// Credentials for the login operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Sign-in email.
    pub email: String,
    /// Plain-text password; only ever sent over the wire, never stored.
    pub password: String,
}

/// Payload for the register operation. New accounts start as students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Sign-in email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Successful login payload: the bearer token plus the identity it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token to persist and attach to subsequent requests.
    pub token: String,
    /// The authenticated account.
    pub user: User,
}

// ============================================================================
// Catalog
// ============================================================================

/// A single lecture within a course stage.
///
/// Lectures are immutable from the learner's perspective and addressed
/// positionally within their stage's list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    /// Server-assigned id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Lecture title.
    pub title: String,
    /// Short description shown under the player.
    #[serde(default)]
    pub description: String,
    /// Server-relative path to the video asset; played by the native media
    /// element, no custom streaming.
    pub video_path: String,
}

/// Reference to a quiz embedded in a course or progress snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRef {
    /// Server-assigned quiz id.
    #[serde(rename = "_id")]
    pub id: String,
}

/// Reference to the tutor attached to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorRef {
    /// Server-assigned tutor id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Tutor display name.
    #[serde(default)]
    pub name: String,
}

/// A catalog course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Server-assigned id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Course title.
    pub title: String,
    /// Catalog description.
    #[serde(default)]
    pub description: String,
    /// Catalog category used by the browse filter.
    #[serde(default)]
    pub category: String,
    /// Price in the platform currency; checkout itself is external.
    #[serde(default)]
    pub price: f64,
    /// Quiz score (0-100) required to unlock the next stage.
    pub passing_score: f64,
    /// Beginner-stage lectures, in playback order.
    #[serde(default)]
    pub beginner_lectures: Vec<Lecture>,
    /// Advanced-stage lectures, in playback order.
    #[serde(default)]
    pub advanced_lectures: Vec<Lecture>,
    /// Beginner quiz, when one has been authored.
    #[serde(default)]
    pub beginner_quiz: Option<QuizRef>,
    /// Advanced quiz, when one has been authored.
    #[serde(default)]
    pub advanced_quiz: Option<QuizRef>,
    /// Assigned tutor, when one exists.
    #[serde(default)]
    pub tutor: Option<TutorRef>,
}

/// Server-side catalog filter carried by the course-list request.
///
/// Both fields are optional; an empty filter lists the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    /// Restrict to one catalog category.
    pub category: Option<String>,
    /// Free-text search term.
    pub search: Option<String>,
}

impl CourseFilter {
    /// Renders the filter as query parameters, omitting unset fields.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref category) = self.category {
            query.push(("category", category.clone()));
        }
        if let Some(ref search) = self.search {
            query.push(("search", search.clone()));
        }
        query
    }
}

// ============================================================================
// Quizzes
// ============================================================================

/// One quiz question with its ordered options.
///
/// The correct answer never leaves the server; submissions are scored there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Question text.
    pub prompt: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
}

/// A quiz with its ordered questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Server-assigned id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Quiz title.
    pub title: String,
    /// Questions, in display order.
    pub questions: Vec<Question>,
}

/// Result of a quiz submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuizResult {
    /// Score as a percentage (0-100), compared against
    /// [`Course::passing_score`].
    pub score: f64,
}

// ============================================================================
// Progress
// ============================================================================

/// A watched-lecture marker inside a progress record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedLecture {
    /// Id of the lecture that was watched to the end.
    pub lecture: String,
}

/// Course snapshot embedded in a progress record.
///
/// The snapshot carries exactly what the progress screen needs; the full
/// catalog entry is fetched separately when required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSnapshot {
    /// Course title.
    pub title: String,
    /// Quiz score required to unlock the next stage.
    pub passing_score: f64,
    /// Beginner-stage lectures, in playback order.
    #[serde(default)]
    pub beginner_lectures: Vec<Lecture>,
    /// Advanced-stage lectures, in playback order.
    #[serde(default)]
    pub advanced_lectures: Vec<Lecture>,
    /// Beginner quiz reference.
    #[serde(default)]
    pub beginner_quiz: Option<QuizRef>,
    /// Advanced quiz reference.
    #[serde(default)]
    pub advanced_quiz: Option<QuizRef>,
}

/// Per-learner, per-course progress as reported by the server.
///
/// The client holds a read-mostly cached copy, invalidated and refetched
/// after any action that can change it (lecture watched, quiz submitted or
/// retaken). The unlock phase is derived from this record, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    /// All beginner lectures have been watched to the end.
    pub completed_beginner_lectures: bool,
    /// Beginner quiz score, once a submission exists.
    pub beginner_quiz_score: Option<f64>,
    /// All advanced lectures have been watched to the end.
    pub completed_advanced_lectures: bool,
    /// Advanced quiz score, once a submission exists.
    pub advanced_quiz_score: Option<f64>,
    /// The certificate has been issued for this course.
    pub certificate_awarded: bool,
    /// Watched markers for the beginner stage.
    #[serde(default)]
    pub watched_beginner_lectures: Vec<WatchedLecture>,
    /// Watched markers for the advanced stage.
    #[serde(default)]
    pub watched_advanced_lectures: Vec<WatchedLecture>,
    /// Embedded course snapshot.
    pub course: CourseSnapshot,
}

impl CourseProgress {
    /// Returns `true` if the given lecture id carries a watched marker in
    /// either stage.
    #[must_use]
    pub fn has_watched(&self, lecture_id: &str) -> bool {
        self.watched_beginner_lectures
            .iter()
            .chain(&self.watched_advanced_lectures)
            .any(|w| w.lecture == lecture_id)
    }
}

// ============================================================================
// Enrollment
// ============================================================================

/// Checkout handle returned by the enroll operation.
///
/// Payment is completed at the external gateway; the client only surfaces
/// the redirect URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Gateway URL to open for payment.
    pub url: String,
}

// ============================================================================
// Tutor assignments
// ============================================================================

/// A tutor-to-course assignment managed from the admin and tutor dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorAssignment {
    /// Server-assigned id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Assigned course id.
    pub course: String,
    /// Assigned tutor id.
    pub tutor: String,
}

// ============================================================================
// Ratings
// ============================================================================

/// Payload for the course- and tutor-rating operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRequest {
    /// Star selection, 1-5. Zero is rejected client-side before any request.
    pub stars: u8,
    /// Optional free-text feedback; not validated beyond being optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

// ============================================================================
// Notes
// ============================================================================

/// A learner-authored note, scoped to a lecture within a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Server-assigned id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Note title.
    pub title: String,
    /// Note body.
    pub description: String,
    /// Lecture the note was taken against.
    pub lecture_id: String,
    /// Course the lecture belongs to.
    pub course_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or updating a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    /// Note title.
    pub title: String,
    /// Note body.
    pub description: String,
    /// Lecture the note is keyed to.
    pub lecture_id: String,
    /// Course the lecture belongs to.
    pub course_id: String,
}

// ============================================================================
// Notifications
// ============================================================================

/// A push notification, delivered over the channel or listed via HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Server-assigned id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Human-readable message.
    pub message: String,
    /// Whether the learner has read it.
    #[serde(default)]
    pub read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Tests
// ============================================================================
