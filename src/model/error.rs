use thiserror::Error;

use crate::dsp::SignalError;
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to load model {path}: {reason}")]
    ModelLoad { path: String, reason: String },
    #[error(
        "model declares {inputs} inputs and {outputs} outputs; at least one of each is required"
    )]
    EmptySignature { inputs: usize, outputs: usize },
    #[error("expected {expected} features, got {actual}")]
    FeatureLength { expected: usize, actual: usize },
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("could not find a float probability output with at least two values")]
    NoProbabilityOutput,
    #[error("model probability output must contain {expected} classes, got {actual}")]
    TooFewProbabilities { expected: usize, actual: usize },
    #[error("invalid decision policy: {0}")]
    Policy(String),
    #[error(transparent)]
    Signal(#[from] SignalError),
}
