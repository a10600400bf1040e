//! In-process mock of the Campus LMS server.
//!
//! Integration tests spin this up on a free port and drive the real client
//! stack against it: the JSON envelope, bearer-token gating, progress and
//! quiz state transitions, rating recording, notes CRUD, and the
//! notification WebSocket. The mock holds one course (`c1`) for one
//! learner and grades every quiz submission with a configurable score.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::{broadcast, Mutex};

use campus_api::types::{
    CourseProgress, CourseSnapshot, Lecture, Note, Notification, Question, Quiz, QuizRef,
    WatchedLecture,
};
use campus_notify::ChannelEvent;

/// The bearer token the mock issues and expects back.
pub const TEST_TOKEN: &str = "test-token";

/// Shared handle to the mock's state.
pub type SharedState = Arc<Mutex<LmsState>>;

/// Server-side state for one learner in one course.
#[derive(Debug)]
pub struct LmsState {
    /// Quiz score (0-100) required to pass.
    pub passing_score: f64,
    /// Beginner-stage lectures.
    pub beginner_lectures: Vec<Lecture>,
    /// Advanced-stage lectures.
    pub advanced_lectures: Vec<Lecture>,
    /// Lecture ids with watched markers.
    pub watched: HashSet<String>,
    /// The beginner quiz.
    pub beginner_quiz: Quiz,
    /// The advanced quiz.
    pub advanced_quiz: Quiz,
    /// Stored beginner score.
    pub beginner_score: Option<f64>,
    /// Stored advanced score.
    pub advanced_score: Option<f64>,
    /// Certificate issued.
    pub certificate: bool,
    /// Score the next submission is graded with.
    pub next_quiz_score: f64,
    /// Recorded course ratings (stars).
    pub course_ratings: Vec<u8>,
    /// Recorded tutor ratings (stars).
    pub tutor_ratings: Vec<u8>,
    /// How many rating requests reached the server at all.
    pub rating_requests: usize,
    /// Stored notes.
    pub notes: Vec<Note>,
    note_counter: usize,
    /// Stored notifications, newest first.
    pub notifications: Vec<Notification>,
    /// When set, the watched endpoint rejects every call.
    pub fail_watch: bool,
    /// Frames pushed to connected WebSocket clients.
    pub notify_tx: broadcast::Sender<ChannelEvent>,
}

impl LmsState {
    /// A course with two beginner lectures, one advanced lecture, and both
    /// quizzes; passing score 60, submissions graded at 80.
    #[must_use]
    pub fn seeded() -> Self {
        let (notify_tx, _) = broadcast::channel(32);
        Self {
            passing_score: 60.0,
            beginner_lectures: vec![lecture("b1", "Intro"), lecture("b2", "Setup")],
            advanced_lectures: vec![lecture("a1", "Lifetimes")],
            watched: HashSet::new(),
            beginner_quiz: quiz("quiz-b", "Beginner Checkpoint"),
            advanced_quiz: quiz("quiz-a", "Advanced Checkpoint"),
            beginner_score: None,
            advanced_score: None,
            certificate: false,
            next_quiz_score: 80.0,
            course_ratings: Vec::new(),
            tutor_ratings: Vec::new(),
            rating_requests: 0,
            notes: Vec::new(),
            note_counter: 0,
            notifications: Vec::new(),
            fail_watch: false,
            notify_tx,
        }
    }

    /// Builds the progress record the server would report.
    #[must_use]
    pub fn progress(&self) -> CourseProgress {
        let watched_of = |lectures: &[Lecture]| -> Vec<WatchedLecture> {
            lectures
                .iter()
                .filter(|l| self.watched.contains(&l.id))
                .map(|l| WatchedLecture {
                    lecture: l.id.clone(),
                })
                .collect()
        };
        let all_watched =
            |lectures: &[Lecture]| lectures.iter().all(|l| self.watched.contains(&l.id));

        CourseProgress {
            completed_beginner_lectures: all_watched(&self.beginner_lectures),
            beginner_quiz_score: self.beginner_score,
            completed_advanced_lectures: all_watched(&self.advanced_lectures),
            advanced_quiz_score: self.advanced_score,
            certificate_awarded: self.certificate,
            watched_beginner_lectures: watched_of(&self.beginner_lectures),
            watched_advanced_lectures: watched_of(&self.advanced_lectures),
            course: CourseSnapshot {
                title: "Rust Basics".to_string(),
                passing_score: self.passing_score,
                beginner_lectures: self.beginner_lectures.clone(),
                advanced_lectures: self.advanced_lectures.clone(),
                beginner_quiz: Some(QuizRef {
                    id: self.beginner_quiz.id.clone(),
                }),
                advanced_quiz: Some(QuizRef {
                    id: self.advanced_quiz.id.clone(),
                }),
            },
        }
    }

    /// Pushes a notification to the stored list and every WebSocket client.
    pub fn push_notification(&mut self, id: &str, message: &str) {
        let notification = notification(id, message);
        self.notifications.insert(0, notification.clone());
        let _ = self
            .notify_tx
            .send(ChannelEvent::Notification(notification));
    }
}

fn lecture(id: &str, title: &str) -> Lecture {
    Lecture {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        video_path: format!("/videos/{id}.mp4"),
    }
}

fn quiz(id: &str, title: &str) -> Quiz {
    Quiz {
        id: id.to_string(),
        title: title.to_string(),
        questions: vec![
            Question {
                prompt: "2 + 2?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
            },
            Question {
                prompt: "Ownership moves by default?".to_string(),
                options: vec!["yes".to_string(), "no".to_string()],
            },
        ],
    }
}

fn notification(id: &str, message: &str) -> Notification {
    Notification {
        id: id.to_string(),
        message: message.to_string(),
        read: false,
        created_at: chrono::Utc::now(),
    }
}

// ============================================================================
// Server
// ============================================================================

/// Spawns the mock on a free port; returns `(http_base, ws_url, state)`.
pub async fn spawn() -> (String, String, SharedState) {
    let state: SharedState = Arc::new(Mutex::new(LmsState::seeded()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    let base = format!("http://{addr}");
    let ws_url = format!("ws://{addr}/ws/notifications");

    let router = router(Arc::clone(&state));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });

    (base, ws_url, state)
}

/// Builds the mock router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/users/login", post(handle_login))
        .route("/api/users/me", get(handle_me))
        .route("/api/progress/:course_id", get(handle_progress))
        .route(
            "/api/progress/:course_id/lectures/:lecture_id/watched",
            post(handle_watched),
        )
        .route("/api/quizzes/:quiz_id", get(handle_get_quiz))
        .route("/api/quizzes/:quiz_id/submit", post(handle_submit_quiz))
        .route("/api/quizzes/:quiz_id/retake", post(handle_retake_quiz))
        .route("/api/courses/:course_id/rating", post(handle_rate_course))
        .route("/api/tutors/:tutor_id/rating", post(handle_rate_tutor))
        .route("/api/notes", post(handle_create_note))
        .route(
            "/api/notes/:id",
            get(handle_list_notes)
                .put(handle_update_note)
                .delete(handle_delete_note),
        )
        .route("/api/notifications", get(handle_list_notifications))
        .route(
            "/api/notifications/:notification_id/read",
            post(handle_mark_read),
        )
        .route("/api/notifications/read-all", post(handle_mark_all_read))
        .route("/ws/notifications", get(handle_ws))
        .with_state(state)
}

fn ok<T: serde::Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn fail(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "message": message }))
}

fn authed(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_login(Json(body): Json<Value>) -> Json<Value> {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if password != "secret" {
        return fail("Invalid credentials");
    }

    ok(json!({
        "token": TEST_TOKEN,
        "user": {
            "_id": "u1",
            "name": "Ada Lovelace",
            "email": email,
            "role": "student",
            "verified": true
        }
    }))
}

async fn handle_me(headers: HeaderMap) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    ok(json!({
        "_id": "u1",
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "role": "student",
        "verified": true
    }))
}

async fn handle_progress(
    State(state): State<SharedState>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    if course_id != "c1" {
        return fail("Course not found");
    }
    let state = state.lock().await;
    ok(state.progress())
}

async fn handle_watched(
    State(state): State<SharedState>,
    Path((course_id, lecture_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    if course_id != "c1" {
        return fail("Course not found");
    }

    let mut state = state.lock().await;
    if state.fail_watch {
        return fail("Watch tracking unavailable");
    }
    state.watched.insert(lecture_id);
    Json(json!({ "success": true }))
}

async fn handle_get_quiz(
    State(state): State<SharedState>,
    Path(quiz_id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let state = state.lock().await;
    if quiz_id == state.beginner_quiz.id {
        ok(&state.beginner_quiz)
    } else if quiz_id == state.advanced_quiz.id {
        ok(&state.advanced_quiz)
    } else {
        fail("Quiz not found")
    }
}

async fn handle_submit_quiz(
    State(state): State<SharedState>,
    Path(quiz_id): Path<String>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    let score = state.next_quiz_score;

    if quiz_id == state.beginner_quiz.id {
        state.beginner_score = Some(score);
    } else if quiz_id == state.advanced_quiz.id {
        state.advanced_score = Some(score);
        if score >= state.passing_score {
            state.certificate = true;
        }
    } else {
        return fail("Quiz not found");
    }

    ok(json!({ "score": score }))
}

async fn handle_retake_quiz(
    State(state): State<SharedState>,
    Path(quiz_id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    if quiz_id == state.beginner_quiz.id {
        state.beginner_score = None;
    } else if quiz_id == state.advanced_quiz.id {
        state.advanced_score = None;
    } else {
        return fail("Quiz not found");
    }
    Json(json!({ "success": true }))
}

async fn handle_rate_course(
    State(state): State<SharedState>,
    Path(_course_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    state.rating_requests += 1;

    let stars = u8::try_from(body["stars"].as_u64().unwrap_or(0)).unwrap_or(0);
    if stars == 0 || stars > 5 {
        return fail("Stars must be between 1 and 5");
    }
    state.course_ratings.push(stars);
    Json(json!({ "success": true }))
}

async fn handle_rate_tutor(
    State(state): State<SharedState>,
    Path(_tutor_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    state.rating_requests += 1;

    let stars = u8::try_from(body["stars"].as_u64().unwrap_or(0)).unwrap_or(0);
    if stars == 0 || stars > 5 {
        return fail("Stars must be between 1 and 5");
    }
    state.tutor_ratings.push(stars);
    Json(json!({ "success": true }))
}

async fn handle_list_notes(
    State(state): State<SharedState>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let state = state.lock().await;
    let notes: Vec<&Note> = state
        .notes
        .iter()
        .filter(|n| n.course_id == course_id)
        .collect();
    ok(notes)
}

async fn handle_create_note(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    state.note_counter += 1;

    let note = Note {
        id: format!("n{}", state.note_counter),
        title: body["title"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().unwrap_or_default().to_string(),
        lecture_id: body["lectureId"].as_str().unwrap_or_default().to_string(),
        course_id: body["courseId"].as_str().unwrap_or_default().to_string(),
        created_at: chrono::Utc::now(),
    };
    state.notes.push(note.clone());
    ok(note)
}

async fn handle_update_note(
    State(state): State<SharedState>,
    Path(note_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    let Some(note) = state.notes.iter_mut().find(|n| n.id == note_id) else {
        return fail("Note not found");
    };
    if let Some(title) = body["title"].as_str() {
        note.title = title.to_string();
    }
    if let Some(description) = body["description"].as_str() {
        note.description = description.to_string();
    }
    ok(note.clone())
}

async fn handle_delete_note(
    State(state): State<SharedState>,
    Path(note_id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    state.notes.retain(|n| n.id != note_id);
    Json(json!({ "success": true }))
}

async fn handle_list_notifications(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let state = state.lock().await;
    ok(&state.notifications)
}

async fn handle_mark_read(
    State(state): State<SharedState>,
    Path(notification_id): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    if let Some(item) = state
        .notifications
        .iter_mut()
        .find(|n| n.id == notification_id)
    {
        item.read = true;
    }
    Json(json!({ "success": true }))
}

async fn handle_mark_all_read(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Json<Value> {
    if !authed(&headers) {
        return fail("Invalid token");
    }
    let mut state = state.lock().await;
    for item in &mut state.notifications {
        item.read = true;
    }
    Json(json!({ "success": true }))
}

// ============================================================================
// WebSocket
// ============================================================================

async fn handle_ws(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<SharedState>,
) -> Response {
    let authorized = params.get("token").is_some_and(|t| t == TEST_TOKEN);
    ws.on_upgrade(move |socket| handle_socket(socket, state, authorized))
}

async fn handle_socket(socket: WebSocket, state: SharedState, authorized: bool) {
    use futures::{SinkExt, StreamExt};

    let (mut sink, mut source) = socket.split();

    if !authorized {
        let _ = sink.send(Message::Close(None)).await;
        return;
    }

    // Connected snapshot first, then live pushes.
    let (snapshot, mut events) = {
        let state = state.lock().await;
        (
            ChannelEvent::Connected(state.notifications.clone()),
            state.notify_tx.subscribe(),
        )
    };

    let Ok(snapshot_json) = serde_json::to_string(&snapshot) else {
        return;
    };
    if sink.send(Message::Text(snapshot_json)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                let Ok(event) = event else { break };
                let Ok(frame) = serde_json::to_string(&event) else { continue };
                if sink.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
            incoming = source.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
