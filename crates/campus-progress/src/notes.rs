//! The notes side panel on the progress screen.
//!
//! Notes are keyed to the current lecture of the current stage, so creation
//! is rejected while a quiz stage is active (there is no current lecture).
//! The section/course filter toggle is a pure client-side filter over the
//! already-fetched list and issues no requests.

use campus_api::types::{Note, NoteDraft};
use campus_api::ApiClient;

use crate::error::{ProgressError, Result};
use crate::room::CourseRoom;

/// Which notes the panel shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteScope {
    /// Notes for the current lecture only.
    #[default]
    Section,
    /// Every note in the course.
    Course,
}

/// Note list and filter state for one course.
#[derive(Debug)]
pub struct NotesPanel {
    course_id: String,
    notes: Vec<Note>,
    scope: NoteScope,
}

impl NotesPanel {
    /// Creates an empty panel for a course.
    #[must_use]
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            notes: Vec::new(),
            scope: NoteScope::default(),
        }
    }

    /// The active filter scope.
    #[must_use]
    pub const fn scope(&self) -> NoteScope {
        self.scope
    }

    /// Switches the filter. Purely local; no request is issued.
    pub fn set_scope(&mut self, scope: NoteScope) {
        self.scope = scope;
    }

    /// Every fetched note, unfiltered.
    #[must_use]
    pub fn all(&self) -> &[Note] {
        &self.notes
    }

    /// The notes visible under the active scope.
    ///
    /// `Section` matches the current lecture id exactly (empty when no
    /// lecture is active); `Course` matches the course id.
    #[must_use]
    pub fn visible(&self, current_lecture_id: Option<&str>) -> Vec<&Note> {
        match self.scope {
            NoteScope::Section => current_lecture_id.map_or_else(Vec::new, |lecture_id| {
                self.notes
                    .iter()
                    .filter(|n| n.lecture_id == lecture_id)
                    .collect()
            }),
            NoteScope::Course => self
                .notes
                .iter()
                .filter(|n| n.course_id == self.course_id)
                .collect(),
        }
    }

    /// Fetches the note list for the course.
    ///
    /// # Errors
    ///
    /// Passes through the API error; the panel keeps its last-known-good
    /// list on failure.
    pub async fn load(&mut self, api: &ApiClient) -> Result<()> {
        self.notes = api.list_notes(&self.course_id).await?;
        Ok(())
    }

    /// Creates a note against the room's current lecture.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::NoteWithoutLecture`] while a quiz or
    /// certification stage is active, before any request is sent.
    pub async fn create(
        &mut self,
        api: &ApiClient,
        room: &CourseRoom,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Note> {
        let Some(lecture) = room.current_lecture() else {
            return Err(ProgressError::NoteWithoutLecture { phase: room.phase() });
        };

        let draft = NoteDraft {
            title: title.into(),
            description: description.into(),
            lecture_id: lecture.id.clone(),
            course_id: self.course_id.clone(),
        };
        let note = api.create_note(&draft).await?;
        self.notes.insert(0, note.clone());
        Ok(note)
    }

    /// Updates a note and refreshes the local copy.
    pub async fn update(&mut self, api: &ApiClient, note_id: &str, draft: &NoteDraft) -> Result<()> {
        let updated = api.update_note(note_id, draft).await?;
        if let Some(existing) = self.notes.iter_mut().find(|n| n.id == note_id) {
            *existing = updated;
        }
        Ok(())
    }

    /// Deletes a note locally and server-side.
    pub async fn delete(&mut self, api: &ApiClient, note_id: &str) -> Result<()> {
        api.delete_note(note_id).await?;
        self.notes.retain(|n| n.id != note_id);
        Ok(())
    }
}
