//! Campus Application Layer
//!
//! Configuration, the session and catalog/enrollment/tutor stores, the
//! route/access layer, and the plain-text screen renderers. Stores are
//! explicit service objects constructed once at startup and passed by
//! reference - no ambient globals.

pub mod catalog;
pub mod config;
pub mod enrollment;
pub mod error;
pub mod routes;
pub mod screens;
pub mod session;
pub mod tutors;

pub use catalog::Catalog;
pub use config::Config;
pub use enrollment::Enrollment;
pub use error::{AppError, Result};
pub use routes::{AccessPolicy, NavState, Route};
pub use screens::{CatalogScreen, NotificationsScreen, ProgressScreen};
pub use session::Session;
pub use tutors::TutorScope;
