//! CLI commands module.

mod challenge;
mod config;
mod devices;
mod hint;
mod speak;
mod stats;
mod submit;
mod util;

pub use challenge::{ChallengeCommand, ShowCommand};
pub use config::ConfigCommand;
pub use devices::DevicesCommand;
pub use hint::HintCommand;
pub use speak::{PlayCommand, SpeakCommand};
pub use stats::StatsCommand;
pub use submit::SubmitCommand;

pub(crate) use util::*;
