//! Typed endpoint wrappers over the Campus HTTP API.
//!
//! [`ApiClient`] is constructed once at startup and handed by reference to
//! every store; there is no ambient global client. Each token-bearing call
//! reads the persistent token store first and aborts with
//! [`ApiError::MissingAuth`](crate::ApiError::MissingAuth) before issuing
//! any request when no token is present. Responses are decoded through the
//! [`Envelope`] so rejections surface the server's message verbatim.
//!
//! The client performs no automatic retries and adds no timeout contract
//! beyond the one configured at construction; retries are user-initiated.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::{ApiError, Result};
use crate::token::TokenStore;
use crate::types::{
    AuthSession, CheckoutSession, Course, CourseFilter, CourseProgress, Credentials, Note,
    NoteDraft, Notification, Quiz, QuizResult, RatingRequest, RegisterRequest, TutorAssignment,
    TutorRef, User,
};

/// HTTP client for the Campus API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    /// Creates a client with the default request timeout (30 seconds).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Result<Self> {
        Self::with_timeout(base_url, tokens, Duration::from_secs(30))
    }

    /// Creates a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        tokens: TokenStore,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Returns the token store this client authenticates with.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Joins a path onto the configured base URL.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // ------------------------------------------------------------------------
    // Transport helpers
    // ------------------------------------------------------------------------

    /// Decodes a response body through the envelope into a typed payload.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) => envelope.into_result(),
            Err(e) if status.is_success() => Err(ApiError::Decode(e)),
            Err(_) => Err(ApiError::unexpected_status(status.as_u16())),
        }
    }

    /// Decodes a response body through the envelope into an acknowledgment.
    async fn decode_ack(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<Envelope<serde_json::Value>>(&body) {
            Ok(envelope) => envelope.into_ack(),
            Err(e) if status.is_success() => Err(ApiError::Decode(e)),
            Err(_) => Err(ApiError::unexpected_status(status.as_u16())),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.tokens.require()?;
        let response = self
            .http
            .get(self.endpoint(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let token = self.tokens.require()?;
        let response = self
            .http
            .get(self.endpoint(path))
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.tokens.require()?;
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let token = self.tokens.require()?;
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode_ack(response).await
    }

    async fn post_empty_ack(&self, path: &str) -> Result<()> {
        let token = self.tokens.require()?;
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode_ack(response).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.tokens.require()?;
        let response = self
            .http
            .put(self.endpoint(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_ack(&self, path: &str) -> Result<()> {
        let token = self.tokens.require()?;
        let response = self
            .http
            .delete(self.endpoint(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode_ack(response).await
    }

    /// Token-free POST used by the auth endpoints.
    async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn post_public_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        Self::decode_ack(response).await
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// Signs in and returns the issued token plus the identity it names.
    ///
    /// The caller decides whether to persist the token; see
    /// `campus-app`'s session store.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        tracing::debug!(email = %credentials.email, "Logging in");
        self.post_public("/api/users/login", credentials).await
    }

    /// Registers a new (student) account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.post_public_ack("/api/users/register", request).await
    }

    /// Confirms an email-verification code.
    pub async fn verify(&self, code: &str) -> Result<()> {
        self.post_public_ack("/api/users/verify", &serde_json::json!({ "code": code }))
            .await
    }

    /// Fetches the identity behind the stored token.
    pub async fn current_user(&self) -> Result<User> {
        self.get("/api/users/me").await
    }

    // ------------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------------

    /// Lists catalog courses, filtered server-side.
    pub async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>> {
        self.get_with_query("/api/courses", &filter.to_query()).await
    }

    /// Fetches a single catalog course.
    pub async fn get_course(&self, course_id: &str) -> Result<Course> {
        self.get(&format!("/api/courses/{course_id}")).await
    }

    /// Creates a course (admin).
    pub async fn create_course(&self, course: &Course) -> Result<Course> {
        self.post("/api/courses", course).await
    }

    /// Updates a course (admin).
    pub async fn update_course(&self, course: &Course) -> Result<Course> {
        self.put(&format!("/api/courses/{}", course.id), course).await
    }

    /// Deletes a course (admin).
    pub async fn delete_course(&self, course_id: &str) -> Result<()> {
        self.delete_ack(&format!("/api/courses/{course_id}")).await
    }

    /// Lists tutors.
    pub async fn list_tutors(&self) -> Result<Vec<TutorRef>> {
        self.get("/api/tutors").await
    }

    /// Fetches a single tutor.
    pub async fn get_tutor(&self, tutor_id: &str) -> Result<TutorRef> {
        self.get(&format!("/api/tutors/{tutor_id}")).await
    }

    // ------------------------------------------------------------------------
    // Enrollment
    // ------------------------------------------------------------------------

    /// Lists the courses the learner is enrolled in.
    pub async fn my_courses(&self) -> Result<Vec<Course>> {
        self.get("/api/enrollments").await
    }

    /// Starts enrollment for a course; payment completes at the returned
    /// gateway URL.
    pub async fn enroll(&self, course_id: &str) -> Result<CheckoutSession> {
        tracing::debug!(course_id, "Starting enrollment checkout");
        self.post(
            &format!("/api/enrollments/{course_id}"),
            &serde_json::json!({}),
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Tutor scope
    // ------------------------------------------------------------------------

    /// Checks whether the stored token is authorized for tutor surfaces.
    pub async fn tutor_authorization(&self) -> Result<bool> {
        self.get("/api/tutors/authorization").await
    }

    /// Lists tutor-to-course assignments visible to this account.
    pub async fn list_assignments(&self) -> Result<Vec<TutorAssignment>> {
        self.get("/api/assignments").await
    }

    /// Assigns a tutor to a course (admin).
    pub async fn assign_tutor(&self, course_id: &str, tutor_id: &str) -> Result<TutorAssignment> {
        self.post(
            "/api/assignments",
            &serde_json::json!({ "courseId": course_id, "tutorId": tutor_id }),
        )
        .await
    }

    /// Removes a tutor-to-course assignment (admin).
    pub async fn unassign_tutor(&self, assignment_id: &str) -> Result<()> {
        self.delete_ack(&format!("/api/assignments/{assignment_id}"))
            .await
    }

    // ------------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------------

    /// Fetches the learner's progress for a course.
    ///
    /// Idempotent; callers decide when to bypass their local cache (a
    /// quiz-completion return always does).
    pub async fn fetch_progress(&self, course_id: &str) -> Result<CourseProgress> {
        self.get(&format!("/api/progress/{course_id}")).await
    }

    /// Records that a lecture was watched to the end.
    pub async fn mark_lecture_watched(&self, course_id: &str, lecture_id: &str) -> Result<()> {
        tracing::debug!(course_id, lecture_id, "Marking lecture watched");
        self.post_empty_ack(&format!(
            "/api/progress/{course_id}/lectures/{lecture_id}/watched"
        ))
        .await
    }

    // ------------------------------------------------------------------------
    // Quizzes
    // ------------------------------------------------------------------------

    /// Fetches a quiz with its ordered questions.
    pub async fn get_quiz(&self, quiz_id: &str) -> Result<Quiz> {
        self.get(&format!("/api/quizzes/{quiz_id}")).await
    }

    /// Submits an answer set; unanswered slots are allowed and scored as
    /// wrong by the server.
    pub async fn submit_quiz(
        &self,
        quiz_id: &str,
        answers: &[Option<usize>],
    ) -> Result<QuizResult> {
        self.post(
            &format!("/api/quizzes/{quiz_id}/submit"),
            &serde_json::json!({ "answers": answers }),
        )
        .await
    }

    /// Clears the stored score for a failed quiz so it can be retaken.
    pub async fn retake_quiz(&self, quiz_id: &str) -> Result<()> {
        self.post_empty_ack(&format!("/api/quizzes/{quiz_id}/retake"))
            .await
    }

    // ------------------------------------------------------------------------
    // Ratings
    // ------------------------------------------------------------------------

    /// Submits a course rating.
    pub async fn rate_course(&self, course_id: &str, rating: &RatingRequest) -> Result<()> {
        self.post_ack(&format!("/api/courses/{course_id}/rating"), rating)
            .await
    }

    /// Submits a tutor rating.
    pub async fn rate_tutor(&self, tutor_id: &str, rating: &RatingRequest) -> Result<()> {
        self.post_ack(&format!("/api/tutors/{tutor_id}/rating"), rating)
            .await
    }

    // ------------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------------

    /// Lists the learner's notes for a course.
    pub async fn list_notes(&self, course_id: &str) -> Result<Vec<Note>> {
        self.get(&format!("/api/notes/{course_id}")).await
    }

    /// Creates a note against the current lecture.
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
        self.post("/api/notes", draft).await
    }

    /// Updates an existing note.
    pub async fn update_note(&self, note_id: &str, draft: &NoteDraft) -> Result<Note> {
        self.put(&format!("/api/notes/{note_id}"), draft).await
    }

    /// Deletes a note.
    pub async fn delete_note(&self, note_id: &str) -> Result<()> {
        self.delete_ack(&format!("/api/notes/{note_id}")).await
    }

    // ------------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------------

    /// Lists notifications, newest first.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.get("/api/notifications").await
    }

    /// Marks one notification as read.
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        self.post_empty_ack(&format!("/api/notifications/{notification_id}/read"))
            .await
    }

    /// Marks every notification as read.
    pub async fn mark_all_notifications_read(&self) -> Result<()> {
        self.post_empty_ack("/api/notifications/read-all").await
    }
}
