//! Output device listing.

use clap::Args;
use serde::Serialize;

use super::get_output;
use crate::Cli;

/// List audio output devices usable with a context's `audio_device`.
#[derive(Args)]
pub struct DevicesCommand {}

#[derive(Serialize)]
struct DeviceList {
    devices: Vec<String>,
}

impl DevicesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let list = DeviceList {
            devices: output_devices()?,
        };
        get_output(cli)?.write(&list, || render_devices(&list.devices))
    }
}

#[cfg(feature = "cpal")]
fn output_devices() -> anyhow::Result<Vec<String>> {
    Ok(kata_audio::CpalSink::list_devices()?)
}

#[cfg(not(feature = "cpal"))]
fn output_devices() -> anyhow::Result<Vec<String>> {
    anyhow::bail!("built without device playback; rebuild with --features cpal")
}

fn render_devices(devices: &[String]) -> String {
    if devices.is_empty() {
        return "No output devices found".to_string();
    }
    devices.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_devices() {
        assert_eq!(render_devices(&[]), "No output devices found");
        let devices = vec!["default".to_string(), "USB Audio".to_string()];
        assert_eq!(render_devices(&devices), "default\nUSB Audio");
    }

    #[cfg(not(feature = "cpal"))]
    #[test]
    fn test_devices_need_cpal_feature() {
        let err = output_devices().unwrap_err();
        assert!(err.to_string().contains("--features cpal"));
    }
}
