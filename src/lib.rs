// src/lib.rs
//! Relative band-power features from a single EEG segment, classified by a
//! pre-trained model into delta, theta, alpha, beta or gamma.
//!
//! The flow is: samples → [`dsp::SpectrumBuilder`] → [`dsp::BandPowers`] →
//! [`model::ClassifierGateway`] → [`model::select_probabilities`] →
//! [`model::evaluate`]. [`pipeline::ClassificationPipeline`] chains them.
pub mod config;
pub mod dsp;
pub mod model;
pub mod pipeline;
pub mod recorder;
pub mod synth;
pub mod types;

pub use pipeline::ClassificationPipeline;
pub use types::{Band, BandFeatures, Classification, Decision};
