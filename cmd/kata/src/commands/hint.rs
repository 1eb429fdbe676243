//! Hint command.

use clap::Args;
use serde::Serialize;

use kata_cli::read_input;

use super::{get_output, open_session, print_warning, wait_for_playback};
use crate::Cli;

/// Ask a question about your code for the current challenge.
#[derive(Args)]
pub struct HintCommand {
    /// The question
    question: String,

    /// Code to ask about, or - for stdin
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// Also speak the answer
    #[arg(short = 's', long)]
    speak: bool,
}

#[derive(Serialize)]
struct HintResult<'a> {
    question: &'a str,
    hint: &'a str,
}

impl HintCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let code = match &self.file {
            Some(path) => read_input(path)?,
            None => String::new(),
        };

        let mut session = open_session(cli, |coach| coach)?;
        let hint = session.hint(&code, &self.question).await?;

        let result = HintResult {
            question: &self.question,
            hint: &hint,
        };
        get_output(cli)?.write(&result, || hint.clone())?;

        if self.speak {
            match session.speak(&hint).await {
                Ok(report) => wait_for_playback(session.playback(), report).await,
                Err(e) => print_warning(&format!("could not speak the hint: {}", e)),
            }
        }
        Ok(())
    }
}
