//! Campus CLI
//!
//! Terminal front end for the Campus LMS client: sign in, open screens by
//! their URL path, and follow the notification channel.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use campus_api::types::Credentials;
use campus_api::{ApiClient, TokenStore};
use campus_app::{
    AccessPolicy, AppError, Catalog, CatalogScreen, Config, Enrollment, NotificationsScreen,
    ProgressScreen, Route, Session, TutorScope,
};
use campus_notify::{NotificationChannel, NotificationFeed};
use campus_progress::{CourseRoom, Phase, QuizSession, RatingStage};

/// Campus - LMS terminal client
///
/// Browse the catalog, follow course progress, sit quizzes, and watch
/// notifications from the command line.
#[derive(Parser, Debug)]
#[command(name = "campus")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: campus.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Override the API base URL from the config
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the bearer token
    Login {
        /// Account email; the password is read from CAMPUS_PASSWORD
        email: String,
    },
    /// Sign out and clear the persisted token
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Open a screen by its URL path (e.g. /courses/<id>/progress)
    Open {
        /// The path to open
        path: String,
        /// Bypass the progress cache, as a quiz-completion return does
        #[arg(long)]
        force_refresh: bool,
    },
    /// Follow the notification channel, printing events as they arrive
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::debug!(command = ?args.command, "Campus CLI starting");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Loads config, builds the API client, and dispatches the subcommand.
async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(ref base_url) = args.base_url {
        config.api_base_url.clone_from(base_url);
    }
    config.validate()?;

    let tokens = TokenStore::new(&config.token_file);
    let api = ApiClient::with_timeout(
        config.api_base_url.as_str(),
        tokens,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    match args.command {
        Command::Login { email } => login(&api, email).await,
        Command::Logout => logout(&api),
        Command::Whoami => whoami(&api).await,
        Command::Open {
            path,
            force_refresh,
        } => open(&api, &path, force_refresh).await,
        Command::Watch => watch(&api, &config).await,
    }
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Runs the login flow with the password taken from the environment.
async fn login(api: &ApiClient, email: String) -> anyhow::Result<()> {
    let password = std::env::var("CAMPUS_PASSWORD").map_err(|_| {
        anyhow::anyhow!(
            "CAMPUS_PASSWORD is not set\n\nSuggestion: export CAMPUS_PASSWORD before running 'campus login'"
        )
    })?;

    let mut session = Session::new();
    let user = session.login(api, &Credentials { email, password }).await?;

    println!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
    Ok(())
}

/// Clears the session.
fn logout(api: &ApiClient) -> anyhow::Result<()> {
    let mut session = Session::new();
    session.logout(api)?;
    println!("Signed out");
    Ok(())
}

/// Prints the identity behind the stored token, if any.
async fn whoami(api: &ApiClient) -> anyhow::Result<()> {
    let mut session = Session::new();
    if session.restore(api).await? {
        if let Some(user) = session.current_user() {
            println!("{} <{}> ({})", user.name, user.email, user.role);
        }
    } else {
        println!("Not signed in");
    }
    Ok(())
}

/// Resolves a path to a screen, checks access, fetches, and renders.
async fn open(api: &ApiClient, path: &str, force_refresh: bool) -> anyhow::Result<()> {
    let route = Route::parse(path).ok_or_else(|| AppError::RouteNotFound {
        path: path.to_string(),
    })?;

    let mut session = Session::new();
    session.restore(api).await?;
    AccessPolicy::check(&route, session.role())?;

    match route {
        Route::Home => {
            println!("Campus - learn something today");
            println!("Try 'campus open /courses' to browse the catalog");
        }
        Route::Login | Route::Register | Route::Verify => {
            println!("Use 'campus login <email>' to sign in");
        }
        Route::Catalog => {
            let mut catalog = Catalog::new();
            catalog.refresh(api).await?;
            print!("{}", CatalogScreen::new(catalog.courses()).generate());
        }
        Route::CourseDetail(course_id) => {
            let course = api.get_course(&course_id).await?;
            println!("# {}\n", course.title);
            println!("{}", course.description);
            println!(
                "Category: {} | Price: ${:.2} | Passing score: {:.0}%",
                course.category, course.price, course.passing_score
            );
        }
        Route::CourseProgress(course_id) => {
            let mut room = CourseRoom::new(course_id);
            room.load(api, force_refresh).await?;
            print!("{}", render_progress(&room));
            for toast in room.take_toasts() {
                eprintln!("! {}", toast.message);
            }
        }
        Route::Quiz { course_id, quiz_id } => {
            let progress = api.fetch_progress(&course_id).await?;
            let quiz = api.get_quiz(&quiz_id).await?;

            let phase = if progress
                .course
                .beginner_quiz
                .as_ref()
                .is_some_and(|q| q.id == quiz_id)
            {
                Phase::BeginnerQuiz
            } else {
                Phase::AdvancedQuiz
            };
            let sitting = QuizSession::new(quiz, phase, progress.course.passing_score);
            print_quiz(&sitting);
        }
        Route::Notes(course_id) => {
            let notes = api.list_notes(&course_id).await?;
            println!("# Notes ({})\n", notes.len());
            for note in notes {
                println!("- {}: {}", note.title, note.description);
            }
        }
        Route::Dashboard => {
            let mut enrollment = Enrollment::new();
            enrollment.refresh(api).await?;
            println!("# My Courses ({})\n", enrollment.courses().len());
            for course in enrollment.courses() {
                println!("- {} ({})", course.title, course.category);
            }
        }
        Route::TutorDashboard => {
            let mut scope = TutorScope::new();
            if !scope.ensure_authorized(api).await? {
                anyhow::bail!("This account is not authorized as a tutor");
            }
            scope.refresh(api).await?;
            println!("# Tutor Assignments ({})\n", scope.assignments().len());
            for assignment in scope.assignments() {
                println!("- course {} -> tutor {}", assignment.course, assignment.tutor);
            }
        }
        Route::AdminDashboard => {
            let mut catalog = Catalog::new();
            catalog.refresh(api).await?;
            catalog.refresh_tutors(api).await?;
            println!(
                "# Admin\n\nCourses: {}\nTutors: {}",
                catalog.courses().len(),
                catalog.tutors().len()
            );
        }
        Route::Notifications => {
            let mut feed = NotificationFeed::new();
            feed.refresh(api).await?;
            print!("{}", NotificationsScreen::new(&feed).generate());
        }
    }

    Ok(())
}

/// Renders the progress screen with the rating prompt wired in.
fn render_progress(room: &CourseRoom) -> String {
    // Rating flags travel with the learner profile server-side; until the
    // screen fetches them it assumes the course rating is still pending.
    let screen = ProgressScreen::new(room);
    if room.phase() == Phase::Certification {
        screen.with_rating(RatingStage::CourseRating).generate()
    } else {
        screen.generate()
    }
}

/// Prints a quiz sitting.
fn print_quiz(session: &QuizSession) {
    println!("# {}\n", session.quiz().title);
    for (number, question) in session.quiz().questions.iter().enumerate() {
        println!("{}. {}", number + 1, question.prompt);
        for (index, option) in question.options.iter().enumerate() {
            println!("   {}) {}", (b'a' + u8::try_from(index).unwrap_or(25)) as char, option);
        }
    }
    println!(
        "\n{} questions; answers are submitted from the app flow",
        session.quiz().questions.len()
    );
}

/// Follows the notification channel until interrupted.
async fn watch(api: &ApiClient, config: &Config) -> anyhow::Result<()> {
    let token = api.tokens().require()?;

    let channel = NotificationChannel::default();
    let mut events = channel.subscribe();
    let mut feed = NotificationFeed::new();

    let url = config.notify_url.clone();
    let runner = tokio::spawn(async move { channel.run(&url, &token).await });

    println!("Watching notifications (Ctrl+C to stop)...");
    loop {
        tokio::select! {
            Ok(()) = tokio::signal::ctrl_c() => {
                println!("Stopped");
                break;
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        feed.apply(event);
                        if let Some(latest) = feed.items().first() {
                            println!("* {} ({} unread)", latest.message, feed.unread_count());
                        }
                    }
                    Err(_) => break,
                }
            }
        }
    }

    runner.abort();
    Ok(())
}
