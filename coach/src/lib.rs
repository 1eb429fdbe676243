//! Coding practice coach.
//!
//! Ties the collaborators of a practice session together:
//!
//! - [`ChallengeProvider`], [`JudgeProvider`], [`HintProvider`] and
//!   [`VoiceSynthesisProvider`], implemented over Gemini by [`GeminiCoach`]
//! - [`StatsTracker`] over a [`StatsStore`] for progress
//! - a [`kata_audio::PlaybackContext`] for spoken feedback
//!
//! # Example
//!
//! ```rust,no_run
//! use kata_audio::{PlaybackContext, WavFileSink};
//! use kata_coach::{FileStatsStore, GeminiCoach, Language, Providers, Session, StatsTracker};
//!
//! # async fn run() -> Result<(), kata_coach::CoachError> {
//! let coach = GeminiCoach::new(kata_gemini::Client::new("AIza...")?);
//! let stats = StatsTracker::open(FileStatsStore::new("stats.json"))?;
//! let playback = PlaybackContext::new(|| Ok(WavFileSink::new("feedback.wav")));
//!
//! let mut session = Session::new(Providers::all(coach), stats, playback);
//! session.new_challenge().await?;
//! let result = session.submit("def solve(): ...", Language::Python).await?;
//! println!("score: {}", result.evaluation.score);
//! # Ok(())
//! # }
//! ```

mod error;
mod gemini;
mod provider;
mod session;
mod stats;
mod types;

pub use error::{CoachError, Result};
pub use gemini::{GeminiCoach, challenge_schema, evaluation_schema};
pub use provider::{ChallengeProvider, HintProvider, JudgeProvider, Timeout, VoiceSynthesisProvider};
pub use session::{Providers, Session, Submission};
pub use stats::{FileStatsStore, MemoryStatsStore, StatsStore, StatsTracker, UserStats};
pub use types::{Challenge, Difficulty, Evaluation, Example, Language};
