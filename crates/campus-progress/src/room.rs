//! The course-room controller behind the progress screen.
//!
//! [`CourseRoom`] owns the cached progress snapshot, the active stage, the
//! position within that stage's lecture list, and the expanded-stage sidebar
//! set. Two rules that were incidental in earlier clients are explicit
//! contracts here:
//!
//! - **Fetch tickets.** Every progress fetch is tagged with a monotonically
//!   increasing sequence id ([`FetchTicket`]). Applying a ticket that is not
//!   the latest issued one is a no-op, so an in-flight response that was
//!   superseded by a newer fetch can never mutate state.
//! - **Mount vs refresh.** The first applied snapshot (mount) unions the
//!   derived stage into the expanded sidebar set, preserving a returning
//!   learner's navigation context. Any later snapshot whose derived stage
//!   differs from the active one replaces the expanded set and resets the
//!   lecture index to zero; a stage-preserving refresh leaves both alone.

use std::collections::BTreeSet;

use campus_api::types::{CourseProgress, Lecture};
use campus_api::ApiClient;

use crate::error::{ProgressError, Result};
use crate::phase::Phase;

// ============================================================================
// Supporting types
// ============================================================================

/// Sequence tag for one issued progress fetch.
///
/// Tickets are only meaningful against the room that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What applying a fetched snapshot did to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The snapshot was applied.
    Applied {
        /// Whether the active stage changed as a result.
        phase_changed: bool,
    },
    /// The ticket was stale; nothing was mutated.
    Discarded,
}

/// What happened after a lecture finished playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LectureAdvance {
    /// More lectures remain in the active stage; the index moved forward by
    /// one.
    NextLecture {
        /// The new lecture index.
        index: usize,
    },
    /// The stage's list is exhausted; the room adopted the freshly derived
    /// stage and reset the lecture index.
    StageComplete {
        /// The stage now active.
        phase: Phase,
    },
    /// A newer fetch superseded this one; nothing was applied.
    Stale,
}

/// A transient, user-visible message. Toasts never block navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Message shown to the user.
    pub message: String,
    /// Whether the toast reports a failure.
    pub is_error: bool,
}

impl Toast {
    /// Creates an error toast.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }

    /// Creates an informational toast.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }
}

// ============================================================================
// CourseRoom
// ============================================================================

/// State container for one learner's view of one course.
#[derive(Debug)]
pub struct CourseRoom {
    course_id: String,
    progress: Option<CourseProgress>,
    phase: Phase,
    lecture_index: usize,
    expanded: BTreeSet<Phase>,
    toasts: Vec<Toast>,
    issued: u64,
}

impl CourseRoom {
    /// Creates a room with no navigation context.
    #[must_use]
    pub fn new(course_id: impl Into<String>) -> Self {
        Self::with_expanded(course_id, BTreeSet::new())
    }

    /// Creates a room seeded with a previously expanded sidebar set, as kept
    /// by a returning learner's session.
    #[must_use]
    pub fn with_expanded(course_id: impl Into<String>, expanded: BTreeSet<Phase>) -> Self {
        Self {
            course_id: course_id.into(),
            progress: None,
            phase: Phase::default(),
            lecture_index: 0,
            expanded,
            toasts: Vec::new(),
            issued: 0,
        }
    }

    /// The course this room is for.
    #[must_use]
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// The active stage.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Index into the active stage's lecture list.
    #[must_use]
    pub const fn lecture_index(&self) -> usize {
        self.lecture_index
    }

    /// The cached progress snapshot, if one has been applied.
    #[must_use]
    pub const fn progress(&self) -> Option<&CourseProgress> {
        self.progress.as_ref()
    }

    /// Returns `true` once a snapshot has been applied.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.progress.is_some()
    }

    /// The stage derived from the cached snapshot, independent of which
    /// stage is being viewed.
    #[must_use]
    pub fn derived_phase(&self) -> Option<Phase> {
        self.progress.as_ref().map(Phase::derive)
    }

    /// The expanded sidebar stages, in unlock order.
    #[must_use]
    pub const fn expanded_phases(&self) -> &BTreeSet<Phase> {
        &self.expanded
    }

    /// The lecture currently selected in the active stage, if that stage has
    /// lectures.
    #[must_use]
    pub fn current_lecture(&self) -> Option<&Lecture> {
        let progress = self.progress.as_ref()?;
        self.phase.lectures(progress).get(self.lecture_index)
    }

    /// Drains the queued toasts for display.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    /// Queues a toast.
    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    // ------------------------------------------------------------------------
    // Fetch sequencing
    // ------------------------------------------------------------------------

    /// Issues a ticket for a fetch that is about to start. Issuing a new
    /// ticket invalidates every earlier one.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Applies a fetched snapshot under the given ticket.
    ///
    /// Stale tickets are discarded without mutating anything. The first
    /// applied snapshot follows the mount contract (expanded-set union); all
    /// later ones follow the refresh contract (stage replace, index reset on
    /// change).
    pub fn apply_fetch(&mut self, ticket: FetchTicket, progress: CourseProgress) -> ApplyOutcome {
        if ticket.0 != self.issued {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Discarding superseded progress fetch"
            );
            return ApplyOutcome::Discarded;
        }

        let derived = Phase::derive(&progress);
        let mount = self.progress.is_none();
        let phase_changed = !mount && derived != self.phase;

        if mount {
            self.expanded.insert(derived);
        } else if phase_changed {
            self.expanded.clear();
            self.expanded.insert(derived);
            self.lecture_index = 0;
        }

        self.phase = derived;
        self.progress = Some(progress);
        ApplyOutcome::Applied { phase_changed }
    }

    /// Loads progress through the cache.
    ///
    /// A cache hit (snapshot present, no forced refresh) applies nothing and
    /// reports no stage change. Callers arriving from a quiz-completion
    /// navigation pass `force_refresh = true` to bypass the cache.
    ///
    /// # Errors
    ///
    /// A failed fetch surfaces the API error and leaves the room at its
    /// last-known-good state; the screen halts until the user retries.
    pub async fn load(&mut self, api: &ApiClient, force_refresh: bool) -> Result<ApplyOutcome> {
        if !force_refresh && self.progress.is_some() {
            return Ok(ApplyOutcome::Applied {
                phase_changed: false,
            });
        }

        let ticket = self.begin_fetch();
        let fresh = api.fetch_progress(&self.course_id).await?;
        Ok(self.apply_fetch(ticket, fresh))
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Switches the view to another stage, resetting the lecture position.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::StageLocked`] when the requested stage's
    /// completion predicates are not met, and [`ProgressError::NotLoaded`]
    /// before the first snapshot arrives.
    pub fn select_phase(&mut self, phase: Phase) -> Result<()> {
        let progress = self.progress.as_ref().ok_or(ProgressError::NotLoaded)?;
        if !phase.is_reachable(progress) {
            return Err(ProgressError::StageLocked { phase });
        }

        self.phase = phase;
        self.lecture_index = 0;
        self.expanded.insert(phase);
        Ok(())
    }

    /// Selects a lecture within the active stage.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::NoActiveLecture`] when the index is out of
    /// range for the active stage's list.
    pub fn select_lecture(&mut self, index: usize) -> Result<()> {
        let progress = self.progress.as_ref().ok_or(ProgressError::NotLoaded)?;
        if index >= self.phase.lectures(progress).len() {
            return Err(ProgressError::NoActiveLecture { phase: self.phase });
        }
        self.lecture_index = index;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Lecture completion
    // ------------------------------------------------------------------------

    /// Runs the lecture-ended sequence for the current lecture.
    ///
    /// The watched marker is fire-and-forget: a failure produces a toast but
    /// never blocks. The forced refresh that follows runs under a fresh
    /// ticket; if it comes back stale the room reports [`LectureAdvance::Stale`]
    /// and stays put. Otherwise the room either advances to the next lecture
    /// in the active stage or adopts the freshly derived stage with the
    /// index reset to zero.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when the forced refresh fails, and
    /// [`ProgressError::NoActiveLecture`] when the active stage has no
    /// current lecture.
    pub async fn handle_lecture_ended(&mut self, api: &ApiClient) -> Result<LectureAdvance> {
        let progress = self.progress.as_ref().ok_or(ProgressError::NotLoaded)?;
        let lectures = self.phase.lectures(progress);
        let lecture = lectures
            .get(self.lecture_index)
            .cloned()
            .ok_or(ProgressError::NoActiveLecture { phase: self.phase })?;
        let had_more = self.lecture_index + 1 < lectures.len();

        if let Err(e) = api.mark_lecture_watched(&self.course_id, &lecture.id).await {
            tracing::warn!(
                error = %e,
                lecture_id = %lecture.id,
                "Failed to record lecture completion"
            );
            self.toasts
                .push(Toast::error(format!("Could not record lecture completion: {e}")));
        }

        let ticket = self.begin_fetch();
        let fresh = api.fetch_progress(&self.course_id).await?;
        let outcome = self.apply_fetch(ticket, fresh);
        Ok(self.resolve_advance(had_more, outcome))
    }

    /// Turns an applied refresh into the lecture-advance decision.
    fn resolve_advance(&mut self, had_more: bool, outcome: ApplyOutcome) -> LectureAdvance {
        match outcome {
            ApplyOutcome::Discarded => LectureAdvance::Stale,
            ApplyOutcome::Applied { phase_changed } => {
                if phase_changed {
                    LectureAdvance::StageComplete { phase: self.phase }
                } else if had_more {
                    self.lecture_index += 1;
                    LectureAdvance::NextLecture {
                        index: self.lecture_index,
                    }
                } else {
                    self.lecture_index = 0;
                    LectureAdvance::StageComplete { phase: self.phase }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
