//! Lecture playback state and watch-percentage throttling.
//!
//! Each lecture runs the machine `Unwatched -> Playing -> Ended`; reaching
//! `Ended` is what triggers the watched marker and the forced progress
//! refresh in [`crate::CourseRoom::handle_lecture_ended`]. The percentage
//! readout is throttled purely to limit render churn - it carries no
//! correctness contract and nothing may depend on its cadence.

use std::time::{Duration, Instant};

use crate::error::{ProgressError, Result};

/// Playback state of a single lecture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not started.
    #[default]
    Unwatched,
    /// The media element is playing.
    Playing,
    /// Played to the end; the watched marker fires once, here.
    Ended,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unwatched => write!(f, "unwatched"),
            Self::Playing => write!(f, "playing"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Per-lecture playback machine.
#[derive(Debug, Default)]
pub struct LecturePlayback {
    state: PlaybackState,
}

impl LecturePlayback {
    /// Creates a machine in the `Unwatched` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Starts (or resumes) playback.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::PlaybackTransition`] from `Ended`; a
    /// finished lecture is re-entered through navigation, not replay.
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Unwatched | PlaybackState::Playing => {
                self.state = PlaybackState::Playing;
                Ok(())
            }
            PlaybackState::Ended => Err(ProgressError::PlaybackTransition {
                from: self.state,
                to: PlaybackState::Playing,
            }),
        }
    }

    /// Marks playback as ended.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::PlaybackTransition`] unless the lecture was
    /// playing; in particular a lecture cannot end without having played,
    /// and cannot end twice.
    pub fn end(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Ended;
                Ok(())
            }
            PlaybackState::Unwatched | PlaybackState::Ended => {
                Err(ProgressError::PlaybackTransition {
                    from: self.state,
                    to: PlaybackState::Ended,
                })
            }
        }
    }
}

/// Throttled watch-percentage readout.
///
/// `current / duration * 100`, emitted at most once per interval
/// (~500 ms by default). Cosmetic only.
#[derive(Debug)]
pub struct WatchPercent {
    min_interval: Duration,
    last_emit: Option<Instant>,
    last_value: f64,
}

impl Default for WatchPercent {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl WatchPercent {
    /// Creates a readout with an explicit emit interval.
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emit: None,
            last_value: 0.0,
        }
    }

    /// The most recently emitted value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.last_value
    }

    /// Feeds a playback position; returns the new percentage when enough
    /// time has passed since the last emit, `None` when throttled.
    pub fn update(&mut self, current_secs: f64, duration_secs: f64) -> Option<f64> {
        self.update_at(current_secs, duration_secs, Instant::now())
    }

    /// Clock-injected variant of [`Self::update`] used by tests.
    pub fn update_at(
        &mut self,
        current_secs: f64,
        duration_secs: f64,
        now: Instant,
    ) -> Option<f64> {
        if let Some(last) = self.last_emit {
            if now.duration_since(last) < self.min_interval {
                return None;
            }
        }

        let percent = if duration_secs > 0.0 {
            (current_secs / duration_secs * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        self.last_emit = Some(now);
        self.last_value = percent;
        Some(percent)
    }
}
