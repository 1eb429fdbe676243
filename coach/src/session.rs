//! Practice session: current challenge, providers, stats and playback.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kata_audio::{PlaybackContext, PlaybackReport};

use crate::error::{CoachError, Result};
use crate::provider::{ChallengeProvider, HintProvider, JudgeProvider, VoiceSynthesisProvider};
use crate::stats::{StatsTracker, UserStats};
use crate::types::{Challenge, Evaluation, Language};

/// The four collaborators a session talks to.
#[derive(Clone)]
pub struct Providers {
    pub challenges: Arc<dyn ChallengeProvider>,
    pub judge: Arc<dyn JudgeProvider>,
    pub hints: Arc<dyn HintProvider>,
    pub voice: Arc<dyn VoiceSynthesisProvider>,
}

impl Providers {
    /// Uses one value for every role.
    pub fn all<P>(provider: P) -> Self
    where
        P: ChallengeProvider + JudgeProvider + HintProvider + VoiceSynthesisProvider + 'static,
    {
        let p = Arc::new(provider);
        Self {
            challenges: p.clone(),
            judge: p.clone(),
            hints: p.clone(),
            voice: p,
        }
    }
}

/// Outcome of [`Session::submit`].
#[derive(Debug)]
pub struct Submission {
    pub evaluation: Evaluation,
    /// Set when the spoken summary was played.
    pub playback: Option<PlaybackReport>,
    /// Set when synthesizing or playing the summary failed. The verdict and
    /// stats are kept regardless.
    pub voice_error: Option<CoachError>,
}

/// A practice session.
///
/// Owns the playback context, so the audio sink is created at most once per
/// session and only when there is something to play.
pub struct Session {
    providers: Providers,
    stats: StatsTracker,
    playback: PlaybackContext,
    current: Option<Challenge>,
    challenge_path: Option<PathBuf>,
}

impl Session {
    pub fn new(providers: Providers, stats: StatsTracker, playback: PlaybackContext) -> Self {
        Self {
            providers,
            stats,
            playback,
            current: None,
            challenge_path: None,
        }
    }

    /// Persists the current challenge at `path`, loading it if the file
    /// already exists.
    pub fn with_challenge_file(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        self.current = load_challenge(&path)?;
        self.challenge_path = Some(path);
        Ok(self)
    }

    pub fn current(&self) -> Option<&Challenge> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> &UserStats {
        self.stats.stats()
    }

    pub fn playback(&self) -> &PlaybackContext {
        &self.playback
    }

    /// Generates a challenge and makes it current.
    pub async fn new_challenge(&mut self) -> Result<&Challenge> {
        let challenge = self.providers.challenges.generate_challenge().await?;
        self.stats.record_challenge()?;
        self.set_challenge(challenge)
    }

    /// Replaces the current challenge.
    pub fn set_challenge(&mut self, challenge: Challenge) -> Result<&Challenge> {
        if let Some(path) = &self.challenge_path {
            save_challenge(path, &challenge)?;
        }
        Ok(self.current.insert(challenge))
    }

    /// Forgets the current challenge.
    pub fn clear_challenge(&mut self) -> Result<()> {
        self.current = None;
        if let Some(path) = &self.challenge_path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Judges `code`, records the attempt and speaks the verdict.
    pub async fn submit(&mut self, code: &str, language: Language) -> Result<Submission> {
        let challenge = self.current.as_ref().ok_or(CoachError::NoChallenge)?;
        let evaluation = self
            .providers
            .judge
            .evaluate(challenge, code, language)
            .await?;
        self.stats.record_attempt(evaluation.passed)?;

        let (playback, voice_error) = match self.speak(evaluation.spoken_text()).await {
            Ok(report) => (report, None),
            Err(e) => {
                tracing::warn!(error = %e, "voice feedback failed");
                (None, Some(e))
            }
        };

        Ok(Submission {
            evaluation,
            playback,
            voice_error,
        })
    }

    /// Asks for a hint about `code`.
    pub async fn hint(&mut self, code: &str, question: &str) -> Result<String> {
        let challenge = self.current.as_ref().ok_or(CoachError::NoChallenge)?;
        let answer = self.providers.hints.hint(challenge, code, question).await?;
        self.stats.record_hint()?;
        Ok(answer)
    }

    /// Synthesizes `script` and plays it. Returns `None` when no audio came
    /// back.
    pub async fn speak(&self, script: &str) -> Result<Option<PlaybackReport>> {
        let payload = self.providers.voice.synthesize(script).await?;
        Ok(self.playback.decode_and_play(Some(payload.as_str()))?)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("current", &self.current.as_ref().map(|c| &c.title))
            .field("stats", self.stats.stats())
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

fn load_challenge(path: &Path) -> Result<Option<Challenge>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn save_challenge(path: &Path, challenge: &Challenge) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(challenge)?)?;
    Ok(())
}

#[cfg(test)]
mod tests;
