//! End-to-end tests for the course-progress flow.
//!
//! Each test spins up the in-process mock LMS and drives the real client
//! stack: token persistence, the progress cache and its forced bypass,
//! lecture advancement, quiz gating and retakes, rating sequencing, and
//! notes.

use campus_api::types::{Credentials, RatingRequest};
use campus_api::{ApiClient, ApiError, TokenStore};
use campus_app::screens::quiz_navigation;
use campus_app::{NavState, Route, Session};
use campus_integration_tests::spawn;
use campus_progress::{
    quiz_gate, CourseRoom, LectureAdvance, NotesPanel, Phase, ProgressError, QuizGate,
    QuizSession, RatingSequencer, RatingStage,
};

/// Builds a client with its own token file.
fn client(base: &str, name: &str) -> ApiClient {
    let tokens =
        TokenStore::new(std::env::temp_dir().join(format!("campus-itest-{name}.json")));
    tokens.clear().expect("clear token store");
    ApiClient::new(base, tokens).expect("build client")
}

/// Signs in as the seeded learner, persisting the token.
async fn sign_in(api: &ApiClient) {
    let mut session = Session::new();
    session
        .login(
            api,
            &Credentials {
                email: "ada@example.com".to_string(),
                password: "secret".to_string(),
            },
        )
        .await
        .expect("login");
}

#[tokio::test]
async fn test_lecture_flow_advances_through_stages() {
    let (base, _ws, _state) = spawn().await;
    let api = client(&base, "lecture-flow");
    sign_in(&api).await;

    let mut room = CourseRoom::new("c1");
    room.load(&api, false).await.expect("initial load");

    assert_eq!(room.phase(), Phase::BeginnerLectures);
    assert_eq!(room.current_lecture().expect("lecture").id, "b1");

    // Finishing lecture 1 of 2 advances the index and keeps the stage.
    let advance = room.handle_lecture_ended(&api).await.expect("advance");
    assert_eq!(advance, LectureAdvance::NextLecture { index: 1 });
    assert_eq!(room.phase(), Phase::BeginnerLectures);
    assert_eq!(room.current_lecture().expect("lecture").id, "b2");

    // Finishing the last lecture flips the server's completion flag; the
    // forced refresh derives the quiz stage and resets the index.
    let advance = room.handle_lecture_ended(&api).await.expect("advance");
    assert_eq!(
        advance,
        LectureAdvance::StageComplete {
            phase: Phase::BeginnerQuiz
        }
    );
    assert_eq!(room.lecture_index(), 0);
    assert!(room.take_toasts().is_empty());
}

#[tokio::test]
async fn test_quiz_pass_unlocks_advanced_after_forced_refresh() {
    let (base, _ws, state) = spawn().await;
    let api = client(&base, "quiz-pass");
    sign_in(&api).await;

    // Learner with beginner lectures complete and no score yet.
    {
        let mut state = state.lock().await;
        state.watched.insert("b1".to_string());
        state.watched.insert("b2".to_string());
    }

    let mut room = CourseRoom::new("c1");
    room.load(&api, false).await.expect("load");
    assert_eq!(room.phase(), Phase::BeginnerQuiz);

    // The stage's single action is "Start Quiz", carrying the gating stage
    // and the quiz-return flag in navigation state.
    let (route, nav) = quiz_navigation(&room).expect("start-quiz navigation");
    assert_eq!(
        route,
        Route::Quiz {
            course_id: "c1".to_string(),
            quiz_id: "quiz-b".to_string()
        }
    );
    assert_eq!(nav, NavState::into_quiz(Phase::BeginnerQuiz));

    // Sit the quiz; the mock grades it at 80 against a passing score of 60.
    let quiz = api.get_quiz("quiz-b").await.expect("quiz");
    let mut sitting = QuizSession::new(quiz, Phase::BeginnerQuiz, 60.0);
    sitting.select_answer(0, 1).expect("answer");
    assert!(sitting.has_unsaved_answers());

    let outcome = sitting.submit(&api).await.expect("submit");
    assert!(outcome.passed);
    assert_eq!(outcome.next_phase, Phase::AdvancedLectures);
    assert!(!sitting.has_unsaved_answers());

    // Returning from the quiz forces a cache bypass; the advanced stage
    // becomes active and selectable.
    room.load(&api, nav.from_quiz).await.expect("forced refresh");
    assert_eq!(room.phase(), Phase::AdvancedLectures);
    assert_eq!(room.current_lecture().expect("lecture").id, "a1");
}

#[tokio::test]
async fn test_cache_hit_skips_refetch_without_force() {
    let (base, _ws, state) = spawn().await;
    let api = client(&base, "cache-hit");
    sign_in(&api).await;

    let mut room = CourseRoom::new("c1");
    room.load(&api, false).await.expect("load");
    assert_eq!(room.phase(), Phase::BeginnerLectures);

    // The server state moves on, but an unforced load serves the cache.
    {
        let mut state = state.lock().await;
        state.watched.insert("b1".to_string());
        state.watched.insert("b2".to_string());
    }
    room.load(&api, false).await.expect("cached load");
    assert_eq!(room.phase(), Phase::BeginnerLectures);

    // A forced load sees the new truth.
    room.load(&api, true).await.expect("forced load");
    assert_eq!(room.phase(), Phase::BeginnerQuiz);
}

#[tokio::test]
async fn test_failed_quiz_gate_and_retake() {
    let (base, _ws, state) = spawn().await;
    let api = client(&base, "quiz-fail");
    sign_in(&api).await;

    {
        let mut state = state.lock().await;
        state.watched.insert("b1".to_string());
        state.watched.insert("b2".to_string());
        state.next_quiz_score = 40.0;
    }

    let quiz = api.get_quiz("quiz-b").await.expect("quiz");
    let mut sitting = QuizSession::new(quiz, Phase::BeginnerQuiz, 60.0);
    let outcome = sitting.submit(&api).await.expect("submit");
    assert!(!outcome.passed);
    assert_eq!(outcome.next_phase, Phase::BeginnerQuiz);

    // The progress screen now shows the failed gate with a retake action.
    let mut room = CourseRoom::new("c1");
    room.load(&api, true).await.expect("load");
    let progress = room.progress().expect("progress");
    assert_eq!(
        quiz_gate(progress, Phase::BeginnerQuiz),
        Some(QuizGate::Failed {
            score: 40.0,
            quiz_id: "quiz-b".to_string()
        })
    );

    // Retaking clears the score server-side; the gate returns to Start.
    sitting.retake(&api).await.expect("retake");
    room.load(&api, true).await.expect("reload");
    assert_eq!(room.phase(), Phase::BeginnerQuiz);
    let progress = room.progress().expect("progress");
    assert_eq!(
        quiz_gate(progress, Phase::BeginnerQuiz),
        Some(QuizGate::Start {
            quiz_id: "quiz-b".to_string()
        })
    );
}

#[tokio::test]
async fn test_full_ladder_to_certification() {
    let (base, _ws, state) = spawn().await;
    let api = client(&base, "certification");
    sign_in(&api).await;

    // Beginner stage done and passed.
    {
        let mut state = state.lock().await;
        state.watched.insert("b1".to_string());
        state.watched.insert("b2".to_string());
        state.beginner_score = Some(80.0);
    }

    let mut room = CourseRoom::new("c1");
    room.load(&api, false).await.expect("load");
    assert_eq!(room.phase(), Phase::AdvancedLectures);

    // Watch the single advanced lecture; its completion derives the
    // advanced quiz stage.
    let advance = room.handle_lecture_ended(&api).await.expect("advance");
    assert_eq!(
        advance,
        LectureAdvance::StageComplete {
            phase: Phase::AdvancedQuiz
        }
    );

    // Passing the advanced quiz awards the certificate.
    let quiz = api.get_quiz("quiz-a").await.expect("quiz");
    let mut sitting = QuizSession::new(quiz, Phase::AdvancedQuiz, 60.0);
    let outcome = sitting.submit(&api).await.expect("submit");
    assert!(outcome.passed);
    assert_eq!(outcome.next_phase, Phase::Certification);

    room.load(&api, true).await.expect("forced refresh");
    assert_eq!(room.phase(), Phase::Certification);
}

#[tokio::test]
async fn test_zero_star_rating_sends_no_request() {
    let (base, _ws, state) = spawn().await;
    let api = client(&base, "rating");
    sign_in(&api).await;

    let mut sequencer = RatingSequencer::new(false, false);
    assert_eq!(sequencer.stage(), RatingStage::CourseRating);

    // Zero stars is rejected client-side; the server never sees it.
    let err = sequencer
        .submit_course_rating(
            &api,
            "c1",
            &RatingRequest {
                stars: 0,
                feedback: None,
            },
        )
        .await
        .expect_err("zero stars");
    assert!(matches!(err, ProgressError::StarsOutOfRange { given: 0 }));
    assert_eq!(state.lock().await.rating_requests, 0);

    // A valid course rating lands and unlocks the tutor modal.
    sequencer
        .submit_course_rating(
            &api,
            "c1",
            &RatingRequest {
                stars: 5,
                feedback: Some("Loved it".to_string()),
            },
        )
        .await
        .expect("course rating");
    assert_eq!(sequencer.stage(), RatingStage::TutorRating);

    sequencer
        .submit_tutor_rating(
            &api,
            "t1",
            &RatingRequest {
                stars: 4,
                feedback: None,
            },
        )
        .await
        .expect("tutor rating");
    assert_eq!(sequencer.stage(), RatingStage::Complete);

    let state = state.lock().await;
    assert_eq!(state.course_ratings, vec![5]);
    assert_eq!(state.tutor_ratings, vec![4]);
    assert_eq!(state.rating_requests, 2);
}

#[tokio::test]
async fn test_tutor_rating_blocked_until_course_rated() {
    let (base, _ws, state) = spawn().await;
    let api = client(&base, "rating-order");
    sign_in(&api).await;

    let mut sequencer = RatingSequencer::new(false, false);
    let err = sequencer
        .submit_tutor_rating(
            &api,
            "t1",
            &RatingRequest {
                stars: 5,
                feedback: None,
            },
        )
        .await
        .expect_err("tutor before course");
    assert!(matches!(err, ProgressError::CourseRatingPending));
    assert_eq!(state.lock().await.rating_requests, 0);
}

#[tokio::test]
async fn test_missing_token_aborts_before_request() {
    let (base, _ws, _state) = spawn().await;
    let api = client(&base, "no-token");

    // No login happened; the operation dies before reaching the server.
    let err = api.fetch_progress("c1").await.expect_err("missing auth");
    assert!(matches!(err, ApiError::MissingAuth));
}

#[tokio::test]
async fn test_rejection_message_surfaces_verbatim() {
    let (base, _ws, _state) = spawn().await;
    let api = client(&base, "rejection");
    sign_in(&api).await;

    let err = api.fetch_progress("missing").await.expect_err("rejected");
    assert!(
        matches!(&err, ApiError::Rejected { message } if message == "Course not found"),
        "expected the server's message verbatim, got: {err:?}"
    );
}

#[tokio::test]
async fn test_watch_failure_produces_toast_but_still_advances() {
    let (base, _ws, state) = spawn().await;
    let api = client(&base, "watch-fail");
    sign_in(&api).await;

    state.lock().await.fail_watch = true;

    let mut room = CourseRoom::new("c1");
    room.load(&api, false).await.expect("load");

    // The watched marker is rejected, but the flow never blocks: the
    // refresh still runs and the index still advances.
    let advance = room.handle_lecture_ended(&api).await.expect("advance");
    assert_eq!(advance, LectureAdvance::NextLecture { index: 1 });

    let toasts = room.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].is_error);
    assert!(toasts[0].message.contains("lecture completion"));
}

#[tokio::test]
async fn test_notes_follow_the_current_lecture() {
    let (base, _ws, state) = spawn().await;
    let api = client(&base, "notes");
    sign_in(&api).await;

    let mut room = CourseRoom::new("c1");
    room.load(&api, false).await.expect("load");

    let mut panel = NotesPanel::new("c1");
    panel.load(&api).await.expect("load notes");

    // A note created in a lecture stage keys to the current lecture.
    let note = panel
        .create(&api, &room, "Ownership", "moves by default")
        .await
        .expect("create note");
    assert_eq!(note.lecture_id, "b1");
    assert_eq!(panel.visible(Some("b1")).len(), 1);
    assert!(panel.visible(Some("b2")).is_empty());

    // Once the quiz stage is active there is no current lecture; creation
    // is rejected before any request.
    {
        let mut state = state.lock().await;
        state.watched.insert("b1".to_string());
        state.watched.insert("b2".to_string());
    }
    room.load(&api, true).await.expect("refresh");
    assert_eq!(room.phase(), Phase::BeginnerQuiz);

    let err = panel
        .create(&api, &room, "stray", "should not exist")
        .await
        .expect_err("quiz stage");
    assert!(matches!(
        err,
        ProgressError::NoteWithoutLecture {
            phase: Phase::BeginnerQuiz
        }
    ));
    assert_eq!(state.lock().await.notes.len(), 1);
}
