//! The enrollment store.
//!
//! Holds the learner's enrolled-course list and starts checkout. Payment
//! completes at the external gateway, so `enroll` hands back a URL rather
//! than mutating the list; the list catches up on the next refresh once
//! the gateway confirms.

use campus_api::types::{CheckoutSession, Course};
use campus_api::ApiClient;

use crate::error::Result;

/// Enrolled-course state for the signed-in learner.
#[derive(Debug, Default)]
pub struct Enrollment {
    courses: Vec<Course>,
}

impl Enrollment {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The enrolled courses.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Returns `true` if the learner is enrolled in the course.
    #[must_use]
    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c.id == course_id)
    }

    /// Refetches the enrolled list.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<()> {
        self.courses = api.my_courses().await?;
        Ok(())
    }

    /// Starts enrollment checkout for a course.
    pub async fn enroll(&self, api: &ApiClient, course_id: &str) -> Result<CheckoutSession> {
        let session = api.enroll(course_id).await?;
        tracing::info!(course_id, "Enrollment checkout started");
        Ok(session)
    }
}
