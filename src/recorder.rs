use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::dsp::SignalError;

/// Writes a single-column sample CSV, one value per line.
#[derive(Debug)]
pub struct SampleRecorder {
    writer: BufWriter<File>,
    path: PathBuf,
    written: usize,
}

impl SampleRecorder {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SignalError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| SignalError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            written: 0,
        })
    }

    pub fn write_sample(&mut self, value: f32) -> Result<(), SignalError> {
        // `{:e}` keeps the shortest text that parses back to the same f32
        writeln!(self.writer, "{value:e}").map_err(|source| self.io_error(source))?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<PathBuf, SignalError> {
        self.writer.flush().map_err(|source| self.io_error(source))?;
        log::info!("wrote {} samples to {}", self.written, self.path.display());
        Ok(self.path)
    }

    fn io_error(&self, source: std::io::Error) -> SignalError {
        SignalError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

pub fn write_samples_csv(path: impl AsRef<Path>, samples: &[f32]) -> Result<PathBuf, SignalError> {
    let mut recorder = SampleRecorder::create(path)?;
    for &value in samples {
        recorder.write_sample(value)?;
    }
    recorder.finish()
}
