//! Session tests with scripted providers.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;

use async_trait::async_trait;
use kata_audio::pcm::encode_base64_pcm;
use kata_audio::{AudioError, PlaybackSink, SampleBuffer};
use tempfile::tempdir;

use super::*;
use crate::stats::MemoryStatsStore;
use crate::types::Difficulty;

// ===== Fakes =====

#[derive(Default)]
struct FakeCoach {
    passed: bool,
    voice_script: String,
    audio: String,
    fail_voice: bool,
    judged: Mutex<Vec<(String, Language)>>,
    spoken: Mutex<Vec<String>>,
}

fn challenge(title: &str) -> Challenge {
    Challenge {
        title: title.into(),
        difficulty: Difficulty::Medium,
        description: "Reverse a linked list.".into(),
        examples: vec![],
        constraints: vec![],
        starter_code: Default::default(),
    }
}

#[async_trait]
impl ChallengeProvider for FakeCoach {
    async fn generate_challenge(&self) -> Result<Challenge> {
        Ok(challenge("Reverse List"))
    }
}

#[async_trait]
impl JudgeProvider for FakeCoach {
    async fn evaluate(&self, _c: &Challenge, code: &str, language: Language) -> Result<Evaluation> {
        self.judged.lock().unwrap().push((code.to_string(), language));
        Ok(Evaluation {
            passed: self.passed,
            score: if self.passed { 95 } else { 20 },
            feedback: "Handles the empty list.".into(),
            time_complexity: "O(n)".into(),
            space_complexity: "O(1)".into(),
            voice_script: self.voice_script.clone(),
        })
    }
}

#[async_trait]
impl HintProvider for FakeCoach {
    async fn hint(&self, c: &Challenge, _code: &str, question: &str) -> Result<String> {
        Ok(format!("{}: think about {}", c.title, question))
    }
}

#[async_trait]
impl VoiceSynthesisProvider for FakeCoach {
    async fn synthesize(&self, script: &str) -> Result<String> {
        self.spoken.lock().unwrap().push(script.to_string());
        if self.fail_voice {
            return Err(CoachError::Provider("tts quota".into()));
        }
        Ok(self.audio.clone())
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    played: Rc<RefCell<Vec<SampleBuffer>>>,
}

impl PlaybackSink for RecordingSink {
    fn play(&self, buffer: SampleBuffer) -> kata_audio::Result<()> {
        self.played.borrow_mut().push(buffer);
        Ok(())
    }
}

struct Harness {
    session: Session,
    coach: Arc<FakeCoach>,
    sink: RecordingSink,
    store: MemoryStatsStore,
}

fn harness(coach: FakeCoach) -> Harness {
    let coach = Arc::new(coach);
    let providers = Providers {
        challenges: coach.clone(),
        judge: coach.clone(),
        hints: coach.clone(),
        voice: coach.clone(),
    };
    let store = MemoryStatsStore::new();
    let sink = RecordingSink::default();
    let factory_sink = sink.clone();
    let playback = PlaybackContext::new(move || Ok(factory_sink.clone()));
    let session = Session::new(
        providers,
        StatsTracker::open(store.clone()).unwrap(),
        playback,
    );
    Harness {
        session,
        coach,
        sink,
        store,
    }
}

// ===== Challenge lifecycle =====

#[tokio::test]
async fn test_new_challenge_records_stats() {
    let mut h = harness(FakeCoach::default());
    assert!(h.session.current().is_none());

    let title = h.session.new_challenge().await.unwrap().title.clone();
    assert_eq!(title, "Reverse List");
    assert_eq!(h.session.stats().challenges_generated, 1);
    assert_eq!(h.store.saved().unwrap().challenges_generated, 1);
}

#[tokio::test]
async fn test_submit_without_challenge() {
    let mut h = harness(FakeCoach::default());
    let err = h.session.submit("x", Language::Go).await.unwrap_err();
    assert!(matches!(err, CoachError::NoChallenge));
    let err = h.session.hint("x", "why?").await.unwrap_err();
    assert!(matches!(err, CoachError::NoChallenge));
    assert!(h.coach.judged.lock().unwrap().is_empty());
    assert_eq!(h.session.stats().attempts, 0);
}

#[tokio::test]
async fn test_challenge_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data/current_challenge.json");

    let mut session = harness(FakeCoach::default())
        .session
        .with_challenge_file(&path)
        .unwrap();
    assert!(session.current().is_none());
    session.new_challenge().await.unwrap();
    assert!(path.exists());

    let reopened = harness(FakeCoach::default())
        .session
        .with_challenge_file(&path)
        .unwrap();
    assert_eq!(reopened.current().unwrap().title, "Reverse List");

    session.clear_challenge().unwrap();
    assert!(!path.exists());
    assert!(session.current().is_none());
    session.clear_challenge().unwrap();
}

// ===== Submit =====

#[tokio::test]
async fn test_submit_pass_speaks_voice_script() {
    let mut h = harness(FakeCoach {
        passed: true,
        voice_script: "Great job!".into(),
        audio: encode_base64_pcm(&[0, 16384, -32768]),
        ..Default::default()
    });
    h.session.set_challenge(challenge("Reverse List")).unwrap();

    let submission = h.session.submit("fn main() {}", Language::Rust).await.unwrap();
    assert!(submission.evaluation.passed);
    assert!(submission.voice_error.is_none());
    assert_eq!(submission.playback.unwrap().samples, 3);

    assert_eq!(h.coach.judged.lock().unwrap()[0].1, Language::Rust);
    assert_eq!(h.coach.spoken.lock().unwrap().as_slice(), ["Great job!"]);
    assert_eq!(h.sink.played.borrow()[0].samples(), &[0.0, 0.5, -1.0]);

    let stats = h.session.stats();
    assert_eq!((stats.attempts, stats.solved, stats.current_streak), (1, 1, 1));
    assert!(stats.last_attempt_at.is_some());
}

#[tokio::test]
async fn test_submit_fail_resets_streak_and_speaks_feedback() {
    let mut h = harness(FakeCoach {
        passed: false,
        ..Default::default()
    });
    h.session.set_challenge(challenge("Reverse List")).unwrap();

    let submission = h.session.submit("pass", Language::Python).await.unwrap();
    assert!(!submission.evaluation.passed);
    assert_eq!(
        h.coach.spoken.lock().unwrap().as_slice(),
        ["Handles the empty list."]
    );
    // No audio came back: nothing played, no sink created.
    assert!(submission.playback.is_none());
    assert!(!h.session.playback().is_initialized());
    assert_eq!(h.session.stats().current_streak, 0);
}

#[tokio::test]
async fn test_submit_keeps_verdict_when_voice_fails() {
    let mut h = harness(FakeCoach {
        passed: true,
        fail_voice: true,
        ..Default::default()
    });
    h.session.set_challenge(challenge("Reverse List")).unwrap();

    let submission = h.session.submit("code", Language::Java).await.unwrap();
    assert!(submission.evaluation.passed);
    assert!(matches!(submission.voice_error, Some(CoachError::Provider(_))));
    assert_eq!(h.session.stats().solved, 1);
}

#[tokio::test]
async fn test_submit_reports_bad_audio() {
    let mut h = harness(FakeCoach {
        passed: true,
        audio: "not base64!".into(),
        ..Default::default()
    });
    h.session.set_challenge(challenge("Reverse List")).unwrap();

    let submission = h.session.submit("code", Language::Cpp).await.unwrap();
    assert!(matches!(
        submission.voice_error,
        Some(CoachError::Audio(AudioError::Decode(_)))
    ));
    assert!(h.sink.played.borrow().is_empty());
}

// ===== Hint and speak =====

#[tokio::test]
async fn test_hint_counts() {
    let mut h = harness(FakeCoach::default());
    h.session.set_challenge(challenge("Reverse List")).unwrap();

    let answer = h.session.hint("", "pointers").await.unwrap();
    assert_eq!(answer, "Reverse List: think about pointers");
    assert_eq!(h.store.saved().unwrap().hints_used, 1);
}

#[tokio::test]
async fn test_speak_reuses_sink() {
    let h = harness(FakeCoach {
        audio: encode_base64_pcm(&[1; 24000]),
        ..Default::default()
    });

    let first = h.session.speak("one").await.unwrap().unwrap();
    h.session.speak("two").await.unwrap();
    assert_eq!(first.duration, std::time::Duration::from_secs(1));
    assert_eq!(h.sink.played.borrow().len(), 2);
}
