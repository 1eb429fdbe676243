//! Progress statistics command.

use clap::Args;
use serde::Serialize;

use kata_coach::{FileStatsStore, StatsTracker, UserStats};

use super::{get_output, get_paths, print_success};
use crate::Cli;

/// Show or reset progress statistics.
#[derive(Args)]
pub struct StatsCommand {
    /// Clear all counters
    #[arg(long)]
    reset: bool,
}

#[derive(Serialize)]
struct StatsView<'a> {
    #[serde(flatten)]
    stats: &'a UserStats,
    success_rate: f64,
}

impl StatsCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut tracker = StatsTracker::open(FileStatsStore::new(get_paths()?.stats_file()))?;

        if self.reset {
            tracker.reset()?;
            print_success("Statistics reset");
            return Ok(());
        }

        let stats = tracker.stats();
        let view = StatsView {
            stats,
            success_rate: stats.success_rate(),
        };
        get_output(cli)?.write(&view, || render_stats(stats))
    }
}

fn render_stats(stats: &UserStats) -> String {
    let last = stats
        .last_attempt_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "Challenges:   {}\nAttempts:     {}\nSolved:       {} ({:.0}%)\nStreak:       {} (best {})\nHints used:   {}\nLast attempt: {}",
        stats.challenges_generated,
        stats.attempts,
        stats.solved,
        stats.success_rate() * 100.0,
        stats.current_streak,
        stats.best_streak,
        stats.hints_used,
        last
    )
}
