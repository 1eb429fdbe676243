//! Challenge commands.

use clap::Args;

use kata_cli::load_request;
use kata_coach::{Challenge, Difficulty, Language};

use super::{get_output, get_paths, open_session, render_challenge};
use crate::Cli;

/// Generate a new challenge and make it current.
#[derive(Args)]
pub struct ChallengeCommand {
    /// Difficulty: easy, medium or hard
    #[arg(short = 'd', long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Topic to practice (e.g. "dynamic programming")
    #[arg(short = 't', long)]
    topic: Option<String>,
}

impl ChallengeCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut session = open_session(cli, |coach| {
            let coach = match self.difficulty {
                Some(d) => coach.difficulty(d),
                None => coach,
            };
            match &self.topic {
                Some(topic) => coach.topic(topic),
                None => coach,
            }
        })?;

        let challenge = session.new_challenge().await?;
        get_output(cli)?.write(challenge, || render_challenge(challenge))
    }
}

/// Show the current challenge.
#[derive(Args)]
pub struct ShowCommand {
    /// Also print the starter code for this language
    #[arg(short = 'l', long)]
    lang: Option<Language>,
}

impl ShowCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let path = get_paths()?.challenge_file();
        if !path.exists() {
            anyhow::bail!("no current challenge. Run 'kata challenge' first");
        }
        let challenge: Challenge = load_request(&path.to_string_lossy())?;

        get_output(cli)?.write(&challenge, || {
            let mut text = render_challenge(&challenge);
            if let Some(lang) = self.lang {
                match challenge.starter_for(lang) {
                    Some(code) => text.push_str(&format!("\n\n{}\n", code.trim_end())),
                    None => text.push_str(&format!("\n\n(no starter code for {})", lang)),
                }
            }
            text
        })
    }
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    match s.to_ascii_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        _ => Err(format!("unknown difficulty '{}': use easy, medium or hard", s)),
    }
}
