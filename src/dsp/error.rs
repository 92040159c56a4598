use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: `{text}` is not a number")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("sample rate must be a finite number greater than zero")]
    InvalidSampleRate,
    #[error("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SignalError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SignalError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for SignalError {
    fn from(value: image::ImageError) -> Self {
        SignalError::Plot(value.to_string())
    }
}
