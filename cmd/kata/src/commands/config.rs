//! Configuration management commands.

use clap::{Args, Subcommand};

use kata_cli::config::{Context as CliContext, mask_api_key};

use super::{get_config, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts allow you to keep several Gemini setups (keys, models, voices),
/// similar to kubectl's context management.
///
/// Configuration is stored in ~/.kata/kata/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add or replace a context
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// Gemini API key
        #[arg(long)]
        api_key: Option<String>,
        /// API base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Maximum retries
        #[arg(long)]
        max_retries: Option<u32>,
        /// Model for challenges, judging and hints
        #[arg(long)]
        text_model: Option<String>,
        /// Model for speech synthesis
        #[arg(long)]
        speech_model: Option<String>,
        /// Prebuilt voice name
        #[arg(long)]
        voice: Option<String>,
        /// Output device name
        #[arg(long)]
        audio_device: Option<String>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// List all contexts
    #[command(name = "list", alias = "list-contexts")]
    List,
    /// Show the configuration
    #[command(name = "show", alias = "view")]
    Show,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                api_key,
                base_url,
                timeout,
                max_retries,
                text_model,
                speech_model,
                voice,
                audio_device,
            } => {
                let mut cfg = get_config(cli)?;

                let ctx = CliContext {
                    api_key: api_key.clone().unwrap_or_default(),
                    base_url: base_url.clone().unwrap_or_default(),
                    timeout: timeout.unwrap_or(0),
                    max_retries: max_retries.unwrap_or(0),
                    text_model: text_model.clone().unwrap_or_default(),
                    speech_model: speech_model.clone().unwrap_or_default(),
                    default_voice: voice.clone().unwrap_or_default(),
                    audio_device: audio_device.clone().unwrap_or_default(),
                    ..Default::default()
                };

                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::List => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!("{:<8} {:<20} {:<24} {}", "CURRENT", "NAME", "TEXT_MODEL", "VOICE");
                for (name, ctx) in &cfg.contexts {
                    let current = if name == &cfg.current_context { "*" } else { "" };
                    println!(
                        "{:<8} {:<20} {:<24} {}",
                        current,
                        name,
                        or_default(&ctx.text_model),
                        or_default(&ctx.default_voice)
                    );
                }

                Ok(())
            }

            ConfigSubcommand::Show => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                for (name, ctx) in &cfg.contexts {
                    println!("\n  {}:", name);
                    if ctx.api_key.is_empty() {
                        println!("    API Key: (from $GEMINI_API_KEY)");
                    } else {
                        println!("    API Key: {}", mask_api_key(&ctx.api_key));
                    }
                    if !ctx.base_url.is_empty() {
                        println!("    Base URL: {}", ctx.base_url);
                    }
                    if ctx.timeout > 0 {
                        println!("    Timeout: {}s", ctx.timeout);
                    }
                    if ctx.max_retries > 0 {
                        println!("    Max Retries: {}", ctx.max_retries);
                    }
                    println!("    Text Model: {}", or_default(&ctx.text_model));
                    println!("    Speech Model: {}", or_default(&ctx.speech_model));
                    println!("    Voice: {}", or_default(&ctx.default_voice));
                    if !ctx.audio_device.is_empty() {
                        println!("    Audio Device: {}", ctx.audio_device);
                    }
                }

                Ok(())
            }
        }
    }
}

fn or_default(value: &str) -> &str {
    if value.is_empty() { "(default)" } else { value }
}
