//! Submission command.

use clap::Args;
use serde::Serialize;

use kata_cli::read_input;
use kata_coach::{Evaluation, Language};

use super::{get_output, open_session, print_warning, render_evaluation, wait_for_playback};
use crate::Cli;

/// Submit a solution to the current challenge.
///
/// The verdict is printed and its summary spoken.
#[derive(Args)]
pub struct SubmitCommand {
    /// Solution file, or - for stdin
    file: String,

    /// Language (default: guessed from the file extension)
    #[arg(short = 'l', long)]
    lang: Option<Language>,
}

#[derive(Serialize)]
struct SubmitResult<'a> {
    language: Language,
    #[serde(flatten)]
    evaluation: &'a Evaluation,
}

impl SubmitCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let language = self.language()?;
        let code = read_input(&self.file)?;
        if code.trim().is_empty() {
            anyhow::bail!("{} is empty", self.file);
        }

        let mut session = open_session(cli, |coach| coach)?;
        tracing::debug!(%language, bytes = code.len(), "submitting");
        let submission = session.submit(&code, language).await?;

        let result = SubmitResult {
            language,
            evaluation: &submission.evaluation,
        };
        get_output(cli)?.write(&result, || render_evaluation(&submission.evaluation))?;

        if let Some(e) = &submission.voice_error {
            print_warning(&format!("voice feedback unavailable: {}", e));
        }
        wait_for_playback(session.playback(), submission.playback).await;
        Ok(())
    }

    fn language(&self) -> anyhow::Result<Language> {
        if let Some(lang) = self.lang {
            return Ok(lang);
        }
        Language::from_path(&self.file).ok_or_else(|| {
            anyhow::anyhow!("cannot tell the language of '{}'; pass --lang", self.file)
        })
    }
}
