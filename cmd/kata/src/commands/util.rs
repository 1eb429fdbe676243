//! Shared helpers for commands.

use std::time::Duration;

use kata_audio::{NullSink, PlaybackContext, PlaybackReport, WavFileSink};
use kata_cli::{API_KEY_ENV, Config, Context, Output, OutputFormat, Paths, load_config};
use kata_coach::{
    Challenge, Evaluation, FileStatsStore, GeminiCoach, Providers, Session, StatsTracker, Timeout,
};
use kata_gemini::Client;

use crate::Cli;

pub const APP_NAME: &str = "kata";

/// How often a drain checks whether the device is still playing.
const DRAIN_POLL: Duration = Duration::from_millis(50);
/// Extra time a drain allows beyond the buffer's own duration.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Loads the configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Resolves the context named by `-c`, or the current one.
///
/// Config load errors and an unknown `-c` name are errors. With no context
/// configured at all, a bare "env" context is returned.
pub fn resolve_context(cli: &Cli) -> anyhow::Result<Context> {
    let cfg = get_config(cli)?;
    match cfg.resolve_context(cli.context.as_deref()) {
        Some(ctx) => Ok(ctx.clone()),
        None => match cli.context.as_deref() {
            Some(name) if !name.is_empty() => anyhow::bail!("context '{}' not found", name),
            _ => Ok(Context {
                name: "env".to_string(),
                ..Default::default()
            }),
        },
    }
}

/// Gets the context to use, with the API key resolved.
///
/// A bare context works as long as GEMINI_API_KEY is set.
pub fn get_context(cli: &Cli) -> anyhow::Result<Context> {
    let mut ctx = resolve_context(cli)?;
    let env_key = std::env::var(API_KEY_ENV).ok();

    ctx.api_key = ctx.api_key_with_override(env_key).ok_or_else(|| {
        anyhow::anyhow!(
            "no API key. Set {} or add a context with 'kata config add-context'",
            API_KEY_ENV
        )
    })?;
    Ok(ctx)
}

/// Returns the directory layout under ~/.kata/kata.
pub fn get_paths() -> anyhow::Result<Paths> {
    Ok(Paths::new(APP_NAME)?)
}

/// Builds the output writer from the global flags.
pub fn get_output(cli: &Cli) -> anyhow::Result<Output> {
    let format = OutputFormat::from_flags(cli.json, cli.output.as_deref())?;
    Ok(Output::new(format, None))
}

/// Creates a Gemini client from a context.
pub fn create_client(ctx: &Context) -> anyhow::Result<Client> {
    let mut builder = Client::builder(&ctx.api_key);

    if !ctx.base_url.is_empty() {
        builder = builder.base_url(&ctx.base_url);
    }
    if ctx.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(ctx.timeout));
    }
    if ctx.max_retries > 0 {
        builder = builder.max_retries(ctx.max_retries);
    }
    if !ctx.text_model.is_empty() {
        builder = builder.text_model(&ctx.text_model);
    }
    if !ctx.speech_model.is_empty() {
        builder = builder.speech_model(&ctx.speech_model);
    }
    if !ctx.default_voice.is_empty() {
        builder = builder.voice(&ctx.default_voice);
    }

    Ok(builder.build()?)
}

/// Builds the playback context from `--mute`, `--audio-out` or the output
/// device. Nothing is opened until there is audio to play.
pub fn playback_context(cli: &Cli, audio_device: &str) -> PlaybackContext {
    if cli.mute {
        return PlaybackContext::with_sink(NullSink);
    }
    if let Some(path) = &cli.audio_out {
        let path = path.clone();
        return PlaybackContext::new(move || Ok(WavFileSink::new(&path)));
    }
    device_context(audio_device)
}

#[cfg(feature = "cpal")]
fn device_context(audio_device: &str) -> PlaybackContext {
    use kata_audio::{CpalSink, Format};

    let device = (!audio_device.is_empty()).then(|| audio_device.to_string());
    PlaybackContext::new(move || CpalSink::open_device(device.as_deref(), Format::MONO_24K))
}

#[cfg(not(feature = "cpal"))]
fn device_context(_audio_device: &str) -> PlaybackContext {
    use kata_audio::AudioError;

    PlaybackContext::new(|| {
        Err::<NullSink, _>(AudioError::unavailable(
            "built without device playback; use --audio-out <file.wav> or --mute",
        ))
    })
}

/// Opens a session over the current context.
pub fn open_session(
    cli: &Cli,
    coach: impl FnOnce(GeminiCoach) -> GeminiCoach,
) -> anyhow::Result<Session> {
    let ctx = get_context(cli)?;
    let paths = get_paths()?;
    tracing::debug!(context = %ctx.name, data = %paths.data_dir().display(), "opening session");

    let coach = coach(GeminiCoach::new(create_client(&ctx)?));
    let providers = Providers::all(Timeout::new(coach, Duration::from_secs(cli.deadline)));
    let stats = StatsTracker::open(FileStatsStore::new(paths.stats_file()))?;

    let session = Session::new(providers, stats, playback_context(cli, &ctx.audio_device))
        .with_challenge_file(paths.challenge_file())?;
    Ok(session)
}

/// Keeps the process alive until the sink has finished playing.
///
/// Playback is fire-and-forget; exiting early would cut the audio off. File
/// and null sinks are never playing, so this returns at once for them. A
/// device that never drains is given up on after the buffer's duration plus
/// [`DRAIN_GRACE`].
pub async fn wait_for_playback(playback: &PlaybackContext, report: Option<PlaybackReport>) {
    let Some(report) = report else { return };
    let deadline = tokio::time::Instant::now() + report.duration + DRAIN_GRACE;

    while playback.is_playing() {
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!("playback still running after {:?}, exiting", report.duration);
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

/// Formats a challenge for the terminal.
pub fn render_challenge(challenge: &Challenge) -> String {
    let mut out = format!(
        "{} [{}]\n\n{}\n",
        challenge.title, challenge.difficulty, challenge.description
    );
    for (i, ex) in challenge.examples.iter().enumerate() {
        out.push_str(&format!(
            "\nExample {}\n  Input:  {}\n  Output: {}\n",
            i + 1,
            ex.input,
            ex.output
        ));
        if let Some(explanation) = &ex.explanation {
            out.push_str(&format!("  Why:    {}\n", explanation));
        }
    }
    if !challenge.constraints.is_empty() {
        out.push_str("\nConstraints\n");
        for c in &challenge.constraints {
            out.push_str(&format!("  - {}\n", c));
        }
    }
    if !challenge.starter_code.is_empty() {
        let langs: Vec<&str> = challenge.starter_code.keys().map(String::as_str).collect();
        out.push_str(&format!("\nStarter code: {}\n", langs.join(", ")));
    }
    out.trim_end().to_string()
}

/// Formats an evaluation for the terminal.
pub fn render_evaluation(evaluation: &Evaluation) -> String {
    let verdict = if evaluation.passed { "PASSED" } else { "FAILED" };
    let mut out = format!("{} ({}/100)\n\n{}\n", verdict, evaluation.score, evaluation.feedback);
    if !evaluation.time_complexity.is_empty() {
        out.push_str(&format!("\nTime:  {}", evaluation.time_complexity));
    }
    if !evaluation.space_complexity.is_empty() {
        out.push_str(&format!("\nSpace: {}", evaluation.space_complexity));
    }
    out.trim_end().to_string()
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Write;

    use super::*;
    use clap::Parser;
    use kata_audio::{PlaybackSink, SampleBuffer};
    use kata_coach::{Difficulty, Example};

    /// Reports playing for `polls` checks, or forever with `None`.
    struct DrainingSink {
        polls: Cell<Option<u32>>,
    }

    impl DrainingSink {
        fn new(polls: Option<u32>) -> Self {
            Self {
                polls: Cell::new(polls),
            }
        }
    }

    impl PlaybackSink for DrainingSink {
        fn play(&self, _buffer: SampleBuffer) -> kata_audio::Result<()> {
            Ok(())
        }

        fn is_playing(&self) -> bool {
            match self.polls.get() {
                None => true,
                Some(0) => false,
                Some(n) => {
                    self.polls.set(Some(n - 1));
                    true
                }
            }
        }
    }

    fn report(millis: u64) -> Option<PlaybackReport> {
        Some(PlaybackReport {
            samples: 24 * millis as usize,
            duration: Duration::from_millis(millis),
        })
    }

    fn cli_with_config(yaml: &str, args: &[&str]) -> (tempfile::TempDir, Cli) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(yaml.as_bytes())
            .unwrap();

        let mut argv = vec!["kata", "--config", path.to_str().unwrap()];
        argv.extend_from_slice(args);
        argv.push("show");
        (dir, Cli::parse_from(argv))
    }

    fn challenge() -> Challenge {
        Challenge {
            title: "Valid Parentheses".into(),
            difficulty: Difficulty::Easy,
            description: "Check that brackets are balanced.".into(),
            examples: vec![Example {
                input: "\"()[]\"".into(),
                output: "true".into(),
                explanation: None,
            }],
            constraints: vec!["1 <= s.length <= 10^4".into()],
            starter_code: [("python".to_string(), "def is_valid(s): ...".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_render_challenge() {
        let text = render_challenge(&challenge());
        assert!(text.starts_with("Valid Parentheses [Easy]"));
        assert!(text.contains("  Output: true"));
        assert!(!text.contains("Why:"));
        assert!(text.contains("  - 1 <= s.length"));
        assert!(text.ends_with("Starter code: python"));
    }

    #[test]
    fn test_render_evaluation() {
        let eval = Evaluation {
            passed: false,
            score: 40,
            feedback: "Misses the empty string.".into(),
            time_complexity: "O(n)".into(),
            space_complexity: String::new(),
            voice_script: String::new(),
        };
        let text = render_evaluation(&eval);
        assert!(text.starts_with("FAILED (40/100)"));
        assert!(text.ends_with("Time:  O(n)"));
    }

    #[test]
    fn test_create_client_applies_context() {
        let ctx = Context {
            api_key: "key".into(),
            base_url: "http://localhost:9999/v1beta".into(),
            text_model: "gemini-2.5-pro".into(),
            default_voice: "Puck".into(),
            ..Default::default()
        };
        let client = create_client(&ctx).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1beta");
        assert_eq!(client.text_model(), "gemini-2.5-pro");
        assert_eq!(client.speech_model(), kata_gemini::DEFAULT_SPEECH_MODEL);
        assert_eq!(client.voice(), "Puck");
    }

    // ===== Context resolution =====

    #[test]
    fn test_resolve_context_current() {
        let yaml = "current_context: work\ncontexts:\n  work:\n    name: work\n    audio_device: USB\n";
        let (_dir, cli) = cli_with_config(yaml, &[]);
        let ctx = resolve_context(&cli).unwrap();
        assert_eq!(ctx.name, "work");
        assert_eq!(ctx.audio_device, "USB");
    }

    #[test]
    fn test_resolve_context_empty_config_is_env() {
        let (_dir, cli) = cli_with_config("", &[]);
        assert_eq!(resolve_context(&cli).unwrap().name, "env");
    }

    #[test]
    fn test_resolve_context_unknown_name_errors() {
        let (_dir, cli) = cli_with_config("", &["-c", "nope"]);
        let err = resolve_context(&cli).unwrap_err();
        assert!(err.to_string().contains("'nope' not found"));
    }

    #[test]
    fn test_resolve_context_corrupt_config_errors() {
        let (_dir, cli) = cli_with_config("contexts: [unclosed\n", &[]);
        assert!(resolve_context(&cli).is_err());
    }

    // ===== Playback drain =====

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_playback_polls_until_idle() {
        let playback = PlaybackContext::with_sink(DrainingSink::new(Some(3)));
        let start = tokio::time::Instant::now();
        wait_for_playback(&playback, report(10_000)).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= DRAIN_POLL * 3);
        assert!(elapsed < DRAIN_POLL * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_playback_gives_up_at_deadline() {
        let playback = PlaybackContext::with_sink(DrainingSink::new(None));
        let start = tokio::time::Instant::now();
        wait_for_playback(&playback, report(500)).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(500) + DRAIN_GRACE);
        assert!(elapsed < Duration::from_millis(500) + DRAIN_GRACE + DRAIN_POLL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_playback_skips_without_report() {
        let playback = PlaybackContext::with_sink(DrainingSink::new(None));
        let start = tokio::time::Instant::now();
        wait_for_playback(&playback, None).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
