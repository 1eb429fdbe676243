//! WAV file sink.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use super::PlaybackSink;
use crate::error::Result;
use crate::pcm::SampleBuffer;

/// Writes each played buffer to a 32-bit float WAV file.
///
/// The first buffer goes to `path`; later ones get a numeric suffix
/// (`speech.wav`, `speech-1.wav`, `speech-2.wav`, ...).
#[derive(Debug)]
pub struct WavFileSink {
    path: PathBuf,
    count: Cell<usize>,
}

impl WavFileSink {
    /// Creates a sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            count: Cell::new(0),
        }
    }

    /// Returns the number of buffers written so far.
    pub fn written(&self) -> usize {
        self.count.get()
    }

    /// Returns the file path used for the `index`-th buffer.
    pub fn path_for(&self, index: usize) -> PathBuf {
        if index == 0 {
            return self.path.clone();
        }
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let name = match self.path.extension() {
            Some(ext) => format!("{}-{}.{}", stem, index, ext.to_string_lossy()),
            None => format!("{}-{}", stem, index),
        };
        self.path.with_file_name(name)
    }
}

impl PlaybackSink for WavFileSink {
    fn play(&self, buffer: SampleBuffer) -> Result<()> {
        let index = self.count.get();
        let path = self.path_for(index);
        write_wav(&path, &buffer)?;
        self.count.set(index + 1);
        tracing::debug!(path = %path.display(), samples = buffer.len(), "wrote wav");
        Ok(())
    }
}

/// Writes a buffer to a 32-bit float WAV file, creating parent directories.
pub fn write_wav(path: &Path, buffer: &SampleBuffer) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let format = buffer.format();
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
