//! Contract between the feature pipeline and whatever runs the model.
//!
//! A gateway takes one feature vector and returns every output the model
//! produced, in the model's declared order. Nothing here knows which output
//! holds the probabilities; that is decided by [`crate::model::selector`].
use crate::model::ClassifierError;

/// Element type of one model output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    Float32,
    Float64,
    Int32,
    Int64,
    Bool,
    String,
    /// A tensor of some other element type.
    Other,
    /// Sequence, map or other non-tensor value.
    NonTensor,
}

impl ElementType {
    pub fn is_float(self) -> bool {
        matches!(self, ElementType::Float32 | ElementType::Float64)
    }
}

/// One named model output.
///
/// `values` carries the data of float outputs only; for every other type it
/// is empty and `element_count` still reports the tensor's size.
#[derive(Clone, Debug, PartialEq)]
pub struct RawOutput {
    pub name: String,
    pub element_type: ElementType,
    pub element_count: usize,
    pub values: Vec<f32>,
}

impl RawOutput {
    pub fn float(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            element_type: ElementType::Float32,
            element_count: values.len(),
            values,
        }
    }

    pub fn opaque(
        name: impl Into<String>,
        element_type: ElementType,
        element_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            element_type,
            element_count,
            values: Vec::new(),
        }
    }
}

/// Maps a feature vector to the model's raw outputs.
///
/// Repeated calls with the same features must return the same outputs.
pub trait ClassifierGateway {
    fn run(&mut self, features: &[f32]) -> Result<Vec<RawOutput>, ClassifierError>;
}

impl<G: ClassifierGateway + ?Sized> ClassifierGateway for Box<G> {
    fn run(&mut self, features: &[f32]) -> Result<Vec<RawOutput>, ClassifierError> {
        (**self).run(features)
    }
}

/// Returns the same outputs on every call; useful for tests and replays.
pub struct StaticGateway {
    outputs: Vec<RawOutput>,
    calls: usize,
}

impl StaticGateway {
    pub fn new(outputs: Vec<RawOutput>) -> Self {
        Self { outputs, calls: 0 }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ClassifierGateway for StaticGateway {
    fn run(&mut self, _features: &[f32]) -> Result<Vec<RawOutput>, ClassifierError> {
        self.calls += 1;
        Ok(self.outputs.clone())
    }
}
