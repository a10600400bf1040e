//! The route/access layer.
//!
//! Maps URL paths to screens and enforces role-scoped visibility against
//! the session. Navigation state carries the quiz-return flag so the
//! progress screen knows to bypass its cache when the learner arrives from
//! a quiz completion.

use campus_api::types::Role;
use campus_progress::Phase;

use crate::error::{AppError, Result};

// ============================================================================
// Routes
// ============================================================================

/// A screen the client can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Landing page.
    Home,
    /// Sign-in form.
    Login,
    /// Registration form.
    Register,
    /// Email-verification form.
    Verify,
    /// Course catalog with filters.
    Catalog,
    /// One course's catalog page.
    CourseDetail(String),
    /// The course-progress screen.
    CourseProgress(String),
    /// A quiz sitting within a course.
    Quiz {
        /// Course the quiz belongs to.
        course_id: String,
        /// The quiz being sat.
        quiz_id: String,
    },
    /// The notes panel for a course.
    Notes(String),
    /// The learner dashboard.
    Dashboard,
    /// The tutor dashboard.
    TutorDashboard,
    /// The admin dashboard.
    AdminDashboard,
    /// The notification list.
    Notifications,
}

impl Route {
    /// Parses a URL path into a route, `None` for unmapped paths.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Some(Self::Home);
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        match segments.as_slice() {
            ["login"] => Some(Self::Login),
            ["register"] => Some(Self::Register),
            ["verify"] => Some(Self::Verify),
            ["courses"] => Some(Self::Catalog),
            ["courses", id] => Some(Self::CourseDetail((*id).to_string())),
            ["courses", id, "progress"] => Some(Self::CourseProgress((*id).to_string())),
            ["courses", course_id, "quiz", quiz_id] => Some(Self::Quiz {
                course_id: (*course_id).to_string(),
                quiz_id: (*quiz_id).to_string(),
            }),
            ["notes", course_id] => Some(Self::Notes((*course_id).to_string())),
            ["dashboard"] => Some(Self::Dashboard),
            ["dashboard", "tutor"] => Some(Self::TutorDashboard),
            ["dashboard", "admin"] => Some(Self::AdminDashboard),
            ["notifications"] => Some(Self::Notifications),
            _ => None,
        }
    }

    /// Renders the route back to its canonical path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Verify => "/verify".to_string(),
            Self::Catalog => "/courses".to_string(),
            Self::CourseDetail(id) => format!("/courses/{id}"),
            Self::CourseProgress(id) => format!("/courses/{id}/progress"),
            Self::Quiz { course_id, quiz_id } => format!("/courses/{course_id}/quiz/{quiz_id}"),
            Self::Notes(course_id) => format!("/notes/{course_id}"),
            Self::Dashboard => "/dashboard".to_string(),
            Self::TutorDashboard => "/dashboard/tutor".to_string(),
            Self::AdminDashboard => "/dashboard/admin".to_string(),
            Self::Notifications => "/notifications".to_string(),
        }
    }

    /// Returns `true` for screens a signed-out visitor may open.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Home
                | Self::Login
                | Self::Register
                | Self::Verify
                | Self::Catalog
                | Self::CourseDetail(_)
        )
    }
}

// ============================================================================
// Navigation state
// ============================================================================

/// State carried alongside a navigation, mirroring what the quiz flow
/// needs: which stage initiated it and whether the navigation returns from
/// a quiz (which forces a progress cache bypass).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    /// The stage the navigation originated from.
    pub current_phase: Option<Phase>,
    /// `true` when arriving from a quiz screen; the progress screen must
    /// bypass its cache.
    pub from_quiz: bool,
}

impl NavState {
    /// Navigation state for entering a quiz from a gating stage.
    #[must_use]
    pub const fn into_quiz(current_phase: Phase) -> Self {
        Self {
            current_phase: Some(current_phase),
            from_quiz: true,
        }
    }
}

// ============================================================================
// Access policy
// ============================================================================

/// Role-scoped visibility rules.
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Checks whether a role (or signed-out visitor) may open a route.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] for gated screens without a
    /// session and [`AppError::AccessDenied`] when the signed-in role does
    /// not reach the screen.
    pub fn check(route: &Route, role: Option<Role>) -> Result<()> {
        if route.is_public() {
            return Ok(());
        }

        let Some(role) = role else {
            return Err(AppError::SignInRequired {
                route: route.path(),
            });
        };

        let allowed = match route {
            Route::TutorDashboard => role.is_staff(),
            Route::AdminDashboard => role == Role::Admin,
            // Everything else gated only on being signed in.
            _ => true,
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::AccessDenied {
                route: route.path(),
                role: role.to_string(),
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
