//! ONNX Runtime implementation of [`ClassifierGateway`].
use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Tensor, ValueType};

use crate::model::gateway::{ClassifierGateway, ElementType, RawOutput};
use crate::model::ClassifierError;

/// Owns one ONNX Runtime session for the lifetime of the pipeline.
///
/// The feature vector is fed to the model's first input as a `[1, n]` float
/// tensor and every declared output is requested.
pub struct OnnxGateway {
    session: Session,
    model_path: PathBuf,
}

impl OnnxGateway {
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = model_path.as_ref();
        log::info!("loading ONNX model from {}", path.display());

        let session = Session::builder()
            .map_err(load_error(path))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_error(path))?
            .with_intra_threads(1)
            .map_err(load_error(path))?
            .commit_from_file(path)
            .map_err(load_error(path))?;

        let inputs = session.inputs.len();
        let outputs = session.outputs.len();
        if inputs == 0 || outputs == 0 {
            return Err(ClassifierError::EmptySignature { inputs, outputs });
        }
        log::info!(
            "model ready: input `{}`, outputs [{}]",
            session.inputs[0].name,
            session
                .outputs
                .iter()
                .map(|o| o.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            session,
            model_path: path.to_path_buf(),
        })
    }
}

impl ClassifierGateway for OnnxGateway {
    fn run(&mut self, features: &[f32]) -> Result<Vec<RawOutput>, ClassifierError> {
        let input = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| ClassifierError::Inference(format!("input tensor shape: {e}")))?;
        let tensor =
            Tensor::from_array(input).map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let mut raw = Vec::new();
        for (name, value) in outputs.iter() {
            raw.push(to_raw_output(name, &value)?);
        }
        Ok(raw)
    }
}

impl Drop for OnnxGateway {
    fn drop(&mut self) {
        log::debug!("releasing ONNX session for {}", self.model_path.display());
    }
}

fn load_error<E: std::fmt::Display>(path: &Path) -> impl Fn(E) -> ClassifierError + '_ {
    move |err| ClassifierError::ModelLoad {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn to_raw_output(name: &str, value: &DynValue) -> Result<RawOutput, ClassifierError> {
    let (ty, count) = match value.dtype() {
        ValueType::Tensor { ty, shape, .. } => {
            (*ty, shape.iter().product::<i64>().max(0) as usize)
        }
        _ => return Ok(RawOutput::opaque(name, ElementType::NonTensor, 0)),
    };
    let output = match ty {
        TensorElementType::Float32 => {
            let (_, data) = value
                .try_extract_tensor::<f32>()
                .map_err(|e| ClassifierError::Inference(format!("output `{name}`: {e}")))?;
            RawOutput::float(name, data.to_vec())
        }
        TensorElementType::Float64 => {
            let (_, data) = value
                .try_extract_tensor::<f64>()
                .map_err(|e| ClassifierError::Inference(format!("output `{name}`: {e}")))?;
            RawOutput {
                element_type: ElementType::Float64,
                ..RawOutput::float(name, data.iter().map(|&v| v as f32).collect())
            }
        }
        TensorElementType::Int32 => RawOutput::opaque(name, ElementType::Int32, count),
        TensorElementType::Int64 => RawOutput::opaque(name, ElementType::Int64, count),
        TensorElementType::Bool => RawOutput::opaque(name, ElementType::Bool, count),
        TensorElementType::String => RawOutput::opaque(name, ElementType::String, count),
        _ => RawOutput::opaque(name, ElementType::Other, count),
    };
    Ok(output)
}
