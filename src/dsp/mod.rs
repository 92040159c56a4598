// src/dsp/mod.rs
pub mod bands;
pub mod error;
pub mod plot;
pub mod source;
pub mod spectrum;
pub use bands::{band_power, relative_band_powers, BandPowers};
pub use error::SignalError;
pub use plot::{render_spectrum_png, PlotStyle};
pub use source::{read_first_column, CsvSource, ManualSource, SampleSeries, SignalSource};
pub use spectrum::{Spectrum, SpectrumBuilder};
