use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use crate::dsp::SignalError;
/// Single-channel segment sampled uniformly at `sample_rate_hz`.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSeries {
    pub sample_rate_hz: f32,
    pub samples: Vec<f32>,
}
impl SampleSeries {
    pub fn new(sample_rate_hz: f32, samples: Vec<f32>) -> Result<Self, SignalError> {
        let series = Self {
            sample_rate_hz,
            samples,
        };
        series.validate()?;
        Ok(series)
    }
    pub fn validate(&self) -> Result<(), SignalError> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(SignalError::InvalidSampleRate);
        }
        if let Some(index) = self.samples.iter().position(|v| !v.is_finite()) {
            return Err(SignalError::NonFiniteSample { index });
        }
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate_hz as f64
    }
    /// `None` when the span does not fit a [`Duration`] (very low rates).
    pub fn duration(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.duration_seconds()).ok()
    }
}
/// Something that can hand over one sample segment.
pub trait SignalSource {
    fn next_series(&mut self) -> Result<Option<SampleSeries>, SignalError>;
}
/// Reads the first comma-separated field of every non-blank line.
pub struct CsvSource {
    path: PathBuf,
    sample_rate_hz: f32,
    consumed: bool,
}
impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, sample_rate_hz: f32) -> Self {
        Self {
            path: path.into(),
            sample_rate_hz,
            consumed: false,
        }
    }
    pub fn load(&self) -> Result<SampleSeries, SignalError> {
        let file = File::open(&self.path).map_err(|source| SignalError::Io {
            path: self.path.clone(),
            source,
        })?;
        let samples = read_first_column(BufReader::new(file)).map_err(|err| match err {
            SignalError::Io { source, .. } => SignalError::Io {
                path: self.path.clone(),
                source,
            },
            other => other,
        })?;
        log::info!(
            "read {} samples from {}",
            samples.len(),
            self.path.display()
        );
        SampleSeries::new(self.sample_rate_hz, samples)
    }
}
impl SignalSource for CsvSource {
    fn next_series(&mut self) -> Result<Option<SampleSeries>, SignalError> {
        if self.consumed {
            return Ok(None);
        }
        self.consumed = true;
        self.load().map(Some)
    }
}
/// Parses one number per line from the first `,`-delimited field.
///
/// Blank lines are skipped. Surrounding whitespace (including a trailing
/// `\r`) is ignored; anything else that fails to parse is an error.
pub fn read_first_column(reader: impl BufRead) -> Result<Vec<f32>, SignalError> {
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| SignalError::Io {
            path: PathBuf::new(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let cell = line.split(',').next().unwrap_or("").trim();
        let value = cell.parse::<f32>().map_err(|source| SignalError::Parse {
            line: idx + 1,
            text: cell.to_string(),
            source,
        })?;
        samples.push(value);
    }
    Ok(samples)
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<SampleSeries>,
}
impl ManualSource {
    pub fn new(series: impl IntoIterator<Item = SampleSeries>) -> Self {
        Self {
            queue: series.into_iter().collect(),
        }
    }
}
impl SignalSource for ManualSource {
    fn next_series(&mut self) -> Result<Option<SampleSeries>, SignalError> {
        Ok(self.queue.pop_front())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    #[test]
    fn reads_first_field_and_skips_blank_lines() {
        let text = "1.5,9\n\n-2e-1,x,y\r\n  \n3\n";
        let samples = read_first_column(Cursor::new(text)).unwrap();
        assert_eq!(samples, vec![1.5, -0.2, 3.0]);
    }
    #[test]
    fn malformed_number_reports_line() {
        let err = read_first_column(Cursor::new("1.0\n\nabc,2\n")).unwrap_err();
        match err {
            SignalError::Parse { line, text, .. } => {
                assert_eq!(line, 3);
                assert_eq!(text, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    #[test]
    fn empty_first_field_is_an_error() {
        assert!(read_first_column(Cursor::new(",1\n")).is_err());
    }
    #[test]
    fn csv_source_yields_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.0\n1.0\n0.0\n-1.0").unwrap();
        let mut source = CsvSource::new(file.path(), 4.0);
        let series = source.next_series().unwrap().unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.duration(), Some(Duration::from_secs(1)));
        assert!(source.next_series().unwrap().is_none());
    }
    #[test]
    fn tiny_sample_rate_has_no_duration() {
        let series = SampleSeries::new(1e-30, vec![1.0]).unwrap();
        assert!(series.duration().is_none());
        assert!(series.duration_seconds() > 1e29);
    }
    #[test]
    fn missing_file_is_io_error() {
        let source = CsvSource::new("/definitely/not/here.csv", 256.0);
        assert!(matches!(source.load(), Err(SignalError::Io { .. })));
    }
    #[test]
    fn series_rejects_bad_rate_and_nan() {
        assert!(matches!(
            SampleSeries::new(0.0, vec![1.0]),
            Err(SignalError::InvalidSampleRate)
        ));
        assert!(matches!(
            SampleSeries::new(256.0, vec![1.0, f32::NAN]),
            Err(SignalError::NonFiniteSample { index: 1 })
        ));
        let mut source = ManualSource::new(vec![SampleSeries::new(128.0, vec![]).unwrap()]);
        assert!(source.next_series().unwrap().unwrap().is_empty());
        assert!(source.next_series().unwrap().is_none());
    }
}
