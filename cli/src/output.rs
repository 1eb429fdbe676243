//! Output utilities for the CLI.

use std::{fs::File, io::Write};

use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// YAML format.
    Yaml,
    /// JSON format.
    Json,
}

impl OutputFormat {
    /// Picks the format from the global `--json` and `-o` flags.
    pub fn from_flags(json: bool, output: Option<&str>) -> anyhow::Result<Self> {
        if json {
            return Ok(OutputFormat::Json);
        }
        match output.map(str::to_ascii_lowercase).as_deref() {
            None | Some("text") => Ok(OutputFormat::Text),
            Some("yaml") | Some("yml") => Ok(OutputFormat::Yaml),
            Some("json") => Ok(OutputFormat::Json),
            Some(other) => anyhow::bail!("unknown output format: {}", other),
        }
    }
}

/// Output configuration.
pub struct Output {
    pub format: OutputFormat,
    pub file: Option<String>,
}

impl Output {
    /// Creates a new output configuration.
    pub fn new(format: OutputFormat, file: Option<String>) -> Self {
        Self { format, file }
    }

    /// Writes `value` structured, or `text` when the format is text.
    pub fn write<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> anyhow::Result<()> {
        let output = self.render(value, text)?;

        match &self.file {
            Some(path) => {
                let mut file = File::create(path)?;
                file.write_all(output.as_bytes())?;
                file.write_all(b"\n")?;
            }
            None => {
                println!("{}", output);
            }
        }

        Ok(())
    }

    fn render<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> anyhow::Result<String> {
        Ok(match self.format {
            OutputFormat::Text => text(),
            OutputFormat::Yaml => serde_yaml::to_string(value)?.trim_end().to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
        })
    }
}
