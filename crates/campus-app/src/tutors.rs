//! The tutor-scope store.
//!
//! Caches the tutor-authorization check and owns the tutor/course
//! assignment list used by the admin and tutor dashboards.

use campus_api::types::TutorAssignment;
use campus_api::ApiClient;

use crate::error::Result;

/// Tutor-authorization state and assignment CRUD.
#[derive(Debug, Default)]
pub struct TutorScope {
    authorized: Option<bool>,
    assignments: Vec<TutorAssignment>,
}

impl TutorScope {
    /// Creates an unchecked store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached authorization answer, if the check has run.
    #[must_use]
    pub const fn authorized(&self) -> Option<bool> {
        self.authorized
    }

    /// The fetched assignments.
    #[must_use]
    pub fn assignments(&self) -> &[TutorAssignment] {
        &self.assignments
    }

    /// Runs (or reuses) the tutor-authorization check.
    pub async fn ensure_authorized(&mut self, api: &ApiClient) -> Result<bool> {
        if let Some(authorized) = self.authorized {
            return Ok(authorized);
        }
        let authorized = api.tutor_authorization().await?;
        self.authorized = Some(authorized);
        Ok(authorized)
    }

    /// Refetches the assignment list.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<()> {
        self.assignments = api.list_assignments().await?;
        Ok(())
    }

    /// Assigns a tutor to a course (admin) and appends locally.
    pub async fn assign(&mut self, api: &ApiClient, course_id: &str, tutor_id: &str) -> Result<()> {
        let assignment = api.assign_tutor(course_id, tutor_id).await?;
        self.assignments.push(assignment);
        Ok(())
    }

    /// Removes an assignment (admin) and drops it locally.
    pub async fn unassign(&mut self, api: &ApiClient, assignment_id: &str) -> Result<()> {
        api.unassign_tutor(assignment_id).await?;
        self.assignments.retain(|a| a.id != assignment_id);
        Ok(())
    }
}
