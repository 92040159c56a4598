use std::f64::consts::TAU;

use rustfft::{num_complex::Complex64, FftPlanner};

use crate::config::SpectrumMethod;
use crate::dsp::SampleSeries;
/// One-sided power spectrum: `N/2 + 1` bins, power scaled by `1/N`.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    pub sample_rate_hz: f32,
    pub frequencies_hz: Vec<f64>,
    pub power: Vec<f64>,
}
impl Spectrum {
    pub fn len(&self) -> usize {
        self.power.len()
    }
    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }
    /// Frequency spacing between adjacent bins, zero for a degenerate spectrum.
    pub fn resolution_hz(&self) -> f64 {
        self.frequencies_hz.get(1).copied().unwrap_or(0.0)
    }
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies_hz
            .iter()
            .copied()
            .zip(self.power.iter().copied())
    }
}
/// Computes power spectra of a fixed method.
pub struct SpectrumBuilder {
    method: SpectrumMethod,
}
impl SpectrumBuilder {
    pub fn with_method(method: SpectrumMethod) -> Self {
        Self { method }
    }
    pub fn compute(&self, series: &SampleSeries) -> Spectrum {
        let power = match self.method {
            SpectrumMethod::Direct => direct_power(&series.samples),
            SpectrumMethod::Fft => fft_power(&series.samples),
        };
        let frequencies_hz = bin_frequencies(series.samples.len(), series.sample_rate_hz);
        log::debug!(
            "{:?} spectrum: {} samples -> {} bins",
            self.method,
            series.samples.len(),
            power.len()
        );
        Spectrum {
            sample_rate_hz: series.sample_rate_hz,
            frequencies_hz,
            power,
        }
    }
}
impl Default for SpectrumBuilder {
    fn default() -> Self {
        Self::with_method(SpectrumMethod::default())
    }
}
fn bin_count(len: usize) -> usize {
    len / 2 + 1
}
fn bin_frequencies(len: usize, sample_rate_hz: f32) -> Vec<f64> {
    let count = bin_count(len);
    if len == 0 {
        return vec![0.0; count];
    }
    (0..count)
        .map(|k| sample_rate_hz as f64 * k as f64 / len as f64)
        .collect()
}
/// `re = Σ x[n]·cos(2πkn/N)`, `im = -Σ x[n]·sin(2πkn/N)`, `power = (re² + im²)/N`.
fn direct_power(samples: &[f32]) -> Vec<f64> {
    let len = samples.len();
    let count = bin_count(len);
    if len == 0 {
        return vec![0.0; count];
    }
    // kn is reduced mod N, so one table of N twiddles covers every bin.
    let twiddles: Vec<(f64, f64)> = (0..len)
        .map(|m| {
            let angle = TAU * m as f64 / len as f64;
            (angle.cos(), angle.sin())
        })
        .collect();
    (0..count)
        .map(|k| {
            let mut re = 0.0f64;
            let mut im = 0.0f64;
            for (n, &x) in samples.iter().enumerate() {
                let (cos, sin) = twiddles[(k * n) % len];
                re += x as f64 * cos;
                im -= x as f64 * sin;
            }
            (re * re + im * im) / len as f64
        })
        .collect()
}
fn fft_power(samples: &[f32]) -> Vec<f64> {
    let len = samples.len();
    let count = bin_count(len);
    if len == 0 {
        return vec![0.0; count];
    }
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(len);
    let mut buffer: Vec<Complex64> = samples
        .iter()
        .map(|&v| Complex64::new(v as f64, 0.0))
        .collect();
    fft.process(&mut buffer);
    buffer
        .iter()
        .take(count)
        .map(|c| c.norm_sqr() / len as f64)
        .collect()
}
