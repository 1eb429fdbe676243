//! Voice output commands.

use clap::Args;
use serde::Serialize;

use kata_audio::PlaybackReport;
use kata_cli::read_input;

use super::{get_output, open_session, playback_context, resolve_context, wait_for_playback};
use crate::Cli;

#[derive(Serialize)]
struct PlayResult {
    played: bool,
    samples: usize,
    duration_ms: u128,
}

impl From<Option<PlaybackReport>> for PlayResult {
    fn from(report: Option<PlaybackReport>) -> Self {
        match report {
            Some(r) => Self {
                played: true,
                samples: r.samples,
                duration_ms: r.duration.as_millis(),
            },
            None => Self {
                played: false,
                samples: 0,
                duration_ms: 0,
            },
        }
    }
}

fn describe(result: &PlayResult) -> String {
    if result.played {
        format!("played {} samples ({} ms)", result.samples, result.duration_ms)
    } else {
        "nothing to play".to_string()
    }
}

/// Speak text with the configured voice.
#[derive(Args)]
pub struct SpeakCommand {
    /// Text to speak
    text: String,
}

impl SpeakCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let session = open_session(cli, |coach| coach)?;
        let report = session.speak(&self.text).await?;

        let result = PlayResult::from(report);
        get_output(cli)?.write(&result, || describe(&result))?;
        wait_for_playback(session.playback(), report).await;
        Ok(())
    }
}

/// Play a base64 16-bit PCM payload (24kHz mono).
#[derive(Args)]
pub struct PlayCommand {
    /// Payload file, or - for stdin
    file: String,
}

impl PlayCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let payload = read_input(&self.file)?;
        // No API key is needed just to pick the output device.
        let device = resolve_context(cli)?.audio_device;

        let playback = playback_context(cli, &device);
        let report = playback.decode_and_play(Some(payload.trim()))?;

        let result = PlayResult::from(report);
        get_output(cli)?.write(&result, || describe(&result))?;
        wait_for_playback(&playback, report).await;
        Ok(())
    }
}
