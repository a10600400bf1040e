//! Quiz gating and the in-progress quiz session.
//!
//! The two quiz stages each expose exactly one action while no score exists
//! ("Start Quiz"); once a score exists they show pass/fail, and a failed
//! attempt offers a retake that clears the stored score server-side before
//! returning. The quiz screen itself only moves forward when the score
//! meets the passing threshold, and returning to the progress screen always
//! implies a forced refresh.

use campus_api::types::{CourseProgress, Quiz, QuizResult};
use campus_api::ApiClient;

use crate::error::{ProgressError, Result};
use crate::phase::Phase;

// ============================================================================
// Gate
// ============================================================================

/// The single action a quiz stage exposes, given the stored score.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizGate {
    /// No submission yet: offer "Start Quiz".
    Start {
        /// Quiz to navigate to.
        quiz_id: String,
    },
    /// Passed: show the score, nothing else to do here.
    Passed {
        /// The passing score.
        score: f64,
    },
    /// Failed: show the score and offer "Retake Quiz".
    Failed {
        /// The failing score.
        score: f64,
        /// Quiz whose score must be cleared before retaking.
        quiz_id: String,
    },
}

/// Computes the gate for a quiz stage, `None` for non-quiz stages or when
/// the course has no quiz authored for that stage.
#[must_use]
pub fn quiz_gate(progress: &CourseProgress, phase: Phase) -> Option<QuizGate> {
    if !phase.is_quiz() {
        return None;
    }
    let quiz = phase.quiz_ref(progress)?;

    match phase.quiz_score(progress) {
        None => Some(QuizGate::Start {
            quiz_id: quiz.id.clone(),
        }),
        Some(score) if score >= progress.course.passing_score => {
            Some(QuizGate::Passed { score })
        }
        Some(score) => Some(QuizGate::Failed {
            score,
            quiz_id: quiz.id.clone(),
        }),
    }
}

// ============================================================================
// Session
// ============================================================================

/// Result of a graded submission, including where it unlocks to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizOutcome {
    /// Score as a percentage (0-100).
    pub score: f64,
    /// Whether the score met the course's passing threshold.
    pub passed: bool,
    /// The stage to continue in: one past the gating stage on a pass,
    /// unchanged on a fail.
    pub next_phase: Phase,
}

impl QuizOutcome {
    fn grade(score: f64, passing_score: f64, phase: Phase) -> Self {
        let passed = score >= passing_score;
        let next_phase = if passed {
            phase.next().unwrap_or(phase)
        } else {
            phase
        };
        Self {
            score,
            passed,
            next_phase,
        }
    }
}

/// One sitting of a quiz: the answer slots and the eventual submission.
#[derive(Debug)]
pub struct QuizSession {
    quiz: Quiz,
    phase: Phase,
    passing_score: f64,
    answers: Vec<Option<usize>>,
    result: Option<QuizResult>,
}

impl QuizSession {
    /// Starts a sitting with every answer slot empty.
    #[must_use]
    pub fn new(quiz: Quiz, phase: Phase, passing_score: f64) -> Self {
        let answers = vec![None; quiz.questions.len()];
        Self {
            quiz,
            phase,
            passing_score,
            answers,
            result: None,
        }
    }

    /// The quiz being sat.
    #[must_use]
    pub const fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// The stage this quiz gates.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The answer slots, one per question.
    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// How many questions have an answer selected.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Selects an option for a question.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range indices and any change after submission.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Result<()> {
        if self.result.is_some() {
            return Err(ProgressError::AlreadySubmitted);
        }
        let valid = self
            .quiz
            .questions
            .get(question)
            .is_some_and(|q| option < q.options.len());
        if !valid {
            return Err(ProgressError::AnswerOutOfRange { question, option });
        }
        self.answers[question] = Some(option);
        Ok(())
    }

    /// Clears a question's answer slot.
    pub fn clear_answer(&mut self, question: usize) {
        if let Some(slot) = self.answers.get_mut(question) {
            *slot = None;
        }
    }

    /// Leave guard: `true` while any answer is selected and no submission
    /// exists yet. Navigating away in this state requires a blocking
    /// confirmation.
    #[must_use]
    pub fn has_unsaved_answers(&self) -> bool {
        self.result.is_none() && self.answers.iter().any(Option::is_some)
    }

    /// The graded outcome, once submitted.
    #[must_use]
    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.result
            .map(|r| QuizOutcome::grade(r.score, self.passing_score, self.phase))
    }

    /// Submits the answer set for server-side grading.
    ///
    /// Unanswered slots are allowed and scored accordingly. A pass unlocks
    /// the next stage; a fail stays put. Either way the caller returns to
    /// the progress screen with a forced refresh.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::AlreadySubmitted`] on a second submission,
    /// or the API error when grading fails.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<QuizOutcome> {
        if self.result.is_some() {
            return Err(ProgressError::AlreadySubmitted);
        }

        let result = api.submit_quiz(&self.quiz.id, &self.answers).await?;
        tracing::debug!(quiz_id = %self.quiz.id, score = result.score, "Quiz graded");
        self.result = Some(result);

        Ok(QuizOutcome::grade(
            result.score,
            self.passing_score,
            self.phase,
        ))
    }

    /// Clears a failed attempt server-side and resets the sitting.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::RetakeUnavailable`] unless a failed
    /// submission exists, or the API error when the clear fails.
    pub async fn retake(&mut self, api: &ApiClient) -> Result<()> {
        match self.outcome() {
            Some(outcome) if !outcome.passed => {}
            _ => return Err(ProgressError::RetakeUnavailable),
        }

        api.retake_quiz(&self.quiz.id).await?;
        self.result = None;
        self.answers = vec![None; self.quiz.questions.len()];
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
