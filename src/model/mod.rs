// src/model/mod.rs
pub mod benchmark;
pub mod decision;
pub mod error;
pub mod gateway;
pub mod onnx;
pub mod selector;
pub use benchmark::{run_benchmark, BenchmarkReport};
pub use decision::{dominance_ratio, evaluate};
pub use error::ClassifierError;
pub use gateway::{ClassifierGateway, ElementType, RawOutput, StaticGateway};
pub use onnx::OnnxGateway;
pub use selector::{score_output, select_output, select_probabilities};
