//! Campus API Client
//!
//! Typed access to the Campus LMS HTTP API: wire types, the JSON response
//! envelope, the persistent bearer-token store, and the endpoint wrappers
//! used by every store in the client.

pub mod client;
pub mod envelope;
pub mod error;
pub mod token;
pub mod types;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::{ApiError, Result};
pub use token::TokenStore;
pub use types::{
    AuthSession, CheckoutSession, Course, CourseFilter, CourseProgress, CourseSnapshot,
    Credentials, Lecture, Note, NoteDraft, Notification, Question, Quiz, QuizRef, QuizResult,
    RatingRequest, RegisterRequest, Role, TutorAssignment, TutorRef, User, WatchedLecture,
};
