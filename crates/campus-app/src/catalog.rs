//! The course catalog store.
//!
//! Owns the course/tutor lists and the category/search filter. The filter
//! is applied server-side; changing it only takes effect on the next
//! `refresh`. Admin CRUD passes through the API and keeps the local list in
//! step without an extra round trip.

use campus_api::types::{Course, CourseFilter, TutorRef};
use campus_api::ApiClient;

use crate::error::Result;

/// Catalog state: courses, tutors, and the active filter.
#[derive(Debug, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    tutors: Vec<TutorRef>,
    filter: CourseFilter,
}

impl Catalog {
    /// Creates an empty catalog with no filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The fetched course list.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// The fetched tutor list.
    #[must_use]
    pub fn tutors(&self) -> &[TutorRef] {
        &self.tutors
    }

    /// The active filter.
    #[must_use]
    pub const fn filter(&self) -> &CourseFilter {
        &self.filter
    }

    /// Sets the category filter; effective on the next refresh.
    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
    }

    /// Sets the search term; effective on the next refresh.
    pub fn set_search(&mut self, search: Option<String>) {
        self.filter.search = search;
    }

    /// Finds a fetched course by id.
    #[must_use]
    pub fn find(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    /// Refetches the course list under the active filter.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<()> {
        self.courses = api.list_courses(&self.filter).await?;
        Ok(())
    }

    /// Refetches the tutor list.
    pub async fn refresh_tutors(&mut self, api: &ApiClient) -> Result<()> {
        self.tutors = api.list_tutors().await?;
        Ok(())
    }

    /// Creates a course (admin) and appends it locally.
    pub async fn create_course(&mut self, api: &ApiClient, course: &Course) -> Result<()> {
        let created = api.create_course(course).await?;
        self.courses.push(created);
        Ok(())
    }

    /// Updates a course (admin) and replaces the local copy.
    pub async fn update_course(&mut self, api: &ApiClient, course: &Course) -> Result<()> {
        let updated = api.update_course(course).await?;
        if let Some(existing) = self.courses.iter_mut().find(|c| c.id == updated.id) {
            *existing = updated;
        }
        Ok(())
    }

    /// Deletes a course (admin) and drops the local copy.
    pub async fn delete_course(&mut self, api: &ApiClient, course_id: &str) -> Result<()> {
        api.delete_course(course_id).await?;
        self.courses.retain(|c| c.id != course_id);
        Ok(())
    }
}
