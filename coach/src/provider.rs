//! Provider traits and the deadline wrapper.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CoachError, Result};
use crate::types::{Challenge, Evaluation, Language};

/// Produces new challenges.
#[async_trait]
pub trait ChallengeProvider: Send + Sync {
    async fn generate_challenge(&self) -> Result<Challenge>;
}

/// Judges a submission against a challenge.
#[async_trait]
pub trait JudgeProvider: Send + Sync {
    async fn evaluate(
        &self,
        challenge: &Challenge,
        code: &str,
        language: Language,
    ) -> Result<Evaluation>;
}

/// Answers a question about the user's current code.
#[async_trait]
pub trait HintProvider: Send + Sync {
    async fn hint(&self, challenge: &Challenge, code: &str, question: &str) -> Result<String>;
}

/// Turns a script into a base64 16-bit PCM payload.
///
/// An empty string means no audio was produced.
#[async_trait]
pub trait VoiceSynthesisProvider: Send + Sync {
    async fn synthesize(&self, script: &str) -> Result<String>;
}

#[async_trait]
impl<P: ChallengeProvider + ?Sized> ChallengeProvider for Arc<P> {
    async fn generate_challenge(&self) -> Result<Challenge> {
        (**self).generate_challenge().await
    }
}

#[async_trait]
impl<P: JudgeProvider + ?Sized> JudgeProvider for Arc<P> {
    async fn evaluate(
        &self,
        challenge: &Challenge,
        code: &str,
        language: Language,
    ) -> Result<Evaluation> {
        (**self).evaluate(challenge, code, language).await
    }
}

#[async_trait]
impl<P: HintProvider + ?Sized> HintProvider for Arc<P> {
    async fn hint(&self, challenge: &Challenge, code: &str, question: &str) -> Result<String> {
        (**self).hint(challenge, code, question).await
    }
}

#[async_trait]
impl<P: VoiceSynthesisProvider + ?Sized> VoiceSynthesisProvider for Arc<P> {
    async fn synthesize(&self, script: &str) -> Result<String> {
        (**self).synthesize(script).await
    }
}

/// Applies a deadline to every call of the wrapped provider.
///
/// On expiry the inner future is dropped and `CoachError::Timeout` is
/// returned.
#[derive(Debug, Clone)]
pub struct Timeout<P> {
    inner: P,
    limit: Duration,
}

impl<P> Timeout<P> {
    pub fn new(inner: P, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn run<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, limit = ?self.limit, "provider call timed out");
                Err(CoachError::Timeout {
                    operation,
                    elapsed: self.limit,
                })
            }
        }
    }
}

#[async_trait]
impl<P: ChallengeProvider> ChallengeProvider for Timeout<P> {
    async fn generate_challenge(&self) -> Result<Challenge> {
        self.run("generate_challenge", self.inner.generate_challenge())
            .await
    }
}

#[async_trait]
impl<P: JudgeProvider> JudgeProvider for Timeout<P> {
    async fn evaluate(
        &self,
        challenge: &Challenge,
        code: &str,
        language: Language,
    ) -> Result<Evaluation> {
        self.run("evaluate", self.inner.evaluate(challenge, code, language))
            .await
    }
}

#[async_trait]
impl<P: HintProvider> HintProvider for Timeout<P> {
    async fn hint(&self, challenge: &Challenge, code: &str, question: &str) -> Result<String> {
        self.run("hint", self.inner.hint(challenge, code, question))
            .await
    }
}

#[async_trait]
impl<P: VoiceSynthesisProvider> VoiceSynthesisProvider for Timeout<P> {
    async fn synthesize(&self, script: &str) -> Result<String> {
        self.run("synthesize", self.inner.synthesize(script)).await
    }
}
