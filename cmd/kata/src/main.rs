//! kata - coding challenges with spoken feedback.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    ChallengeCommand, ConfigCommand, DevicesCommand, HintCommand, PlayCommand, ShowCommand,
    SpeakCommand, StatsCommand, SubmitCommand,
};

/// kata - coding challenges with spoken feedback.
///
/// Generates practice problems, judges your solutions and reads the verdict
/// aloud, all through the Gemini API:
///   - challenge: get a new problem
///   - submit: have a solution judged
///   - hint: ask a question about your code
///   - speak / play: voice output
///   - devices: list audio output devices
///   - stats: progress and streaks
///
/// Configuration is stored in ~/.kata/kata/ and supports multiple contexts,
/// similar to kubectl's context management. GEMINI_API_KEY overrides the
/// context's API key.
#[derive(Parser)]
#[command(name = "kata")]
#[command(about = "Coding practice with spoken feedback")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.kata/kata/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output format: text, yaml or json
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Write spoken audio to this WAV file instead of the output device
    #[arg(long, global = true, value_name = "WAV")]
    pub audio_out: Option<String>,

    /// Do not play any audio
    #[arg(long, global = true, conflicts_with = "audio_out")]
    pub mute: bool,

    /// Deadline for each Gemini call, in seconds
    #[arg(long, global = true, default_value_t = 180)]
    pub deadline: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Generate a new challenge
    Challenge(ChallengeCommand),
    /// Show the current challenge
    Show(ShowCommand),
    /// Submit a solution for judging
    Submit(SubmitCommand),
    /// Ask for a hint
    Hint(HintCommand),
    /// Speak text aloud
    Speak(SpeakCommand),
    /// Play a base64 PCM payload
    Play(PlayCommand),
    /// List audio output devices
    Devices(DevicesCommand),
    /// Show or reset progress statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Challenge(cmd) => cmd.run(&cli).await,
        Commands::Show(cmd) => cmd.run(&cli).await,
        Commands::Submit(cmd) => cmd.run(&cli).await,
        Commands::Hint(cmd) => cmd.run(&cli).await,
        Commands::Speak(cmd) => cmd.run(&cli).await,
        Commands::Play(cmd) => cmd.run(&cli).await,
        Commands::Devices(cmd) => cmd.run(&cli).await,
        Commands::Stats(cmd) => cmd.run(&cli).await,
    }
}
