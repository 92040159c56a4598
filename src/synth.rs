// src/synth.rs
//! Synthetic single-channel segments with a known dominant band, for trying
//! the classifier without a recording.
use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::dsp::SignalError;
use crate::recorder::write_samples_csv;

pub const REFERENCE_SAMPLE_RATE_HZ: f32 = 256.0;
pub const REFERENCE_SECONDS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Component {
    pub freq_hz: f32,
    pub amplitude: f32,
}

/// Sum of sinusoids with random phase plus white Gaussian noise.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticSignal {
    pub components: Vec<Component>,
    pub noise_std: f32,
}

impl SyntheticSignal {
    pub fn new(components: &[(f32, f32)], noise_std: f32) -> Self {
        Self {
            components: components
                .iter()
                .map(|&(freq_hz, amplitude)| Component { freq_hz, amplitude })
                .collect(),
            noise_std,
        }
    }

    pub fn render<R: Rng>(&self, sample_rate_hz: f32, len: usize, rng: &mut R) -> Vec<f32> {
        let mut signal = vec![0.0f64; len];
        for component in &self.components {
            let phase = rng.gen_range(0.0..TAU);
            for (n, value) in signal.iter_mut().enumerate() {
                let t = n as f64 / sample_rate_hz as f64;
                *value += component.amplitude as f64
                    * (TAU * component.freq_hz as f64 * t + phase).sin();
            }
        }
        for value in signal.iter_mut() {
            *value += self.noise_std as f64 * rng.sample::<f64, _>(StandardNormal);
        }
        signal.into_iter().map(|v| v as f32).collect()
    }
}

/// The named reference set: one dominant-band signal per class plus a mixed
/// alpha/beta signal and a noisy one.
pub fn reference_signals() -> Vec<(&'static str, SyntheticSignal)> {
    const NOISE: f32 = 0.55;
    vec![
        (
            "delta_dominant",
            SyntheticSignal::new(&[(2.0, 1.3), (6.0, 0.2), (10.0, 0.1)], NOISE),
        ),
        (
            "theta_dominant",
            SyntheticSignal::new(&[(6.0, 1.3), (2.0, 0.2), (10.0, 0.1)], NOISE),
        ),
        (
            "alpha_dominant",
            SyntheticSignal::new(&[(10.0, 1.3), (6.0, 0.2), (20.0, 0.1)], NOISE),
        ),
        (
            "beta_dominant",
            SyntheticSignal::new(&[(20.0, 1.3), (10.0, 0.2), (40.0, 0.1)], NOISE),
        ),
        (
            "gamma_dominant",
            SyntheticSignal::new(&[(40.0, 1.1), (20.0, 0.2), (10.0, 0.1)], NOISE),
        ),
        (
            "mixed_alpha_beta",
            SyntheticSignal::new(&[(10.0, 0.9), (20.0, 0.9), (6.0, 0.15)], NOISE),
        ),
        (
            "noisy",
            SyntheticSignal::new(&[(10.0, 0.25), (20.0, 0.25), (40.0, 0.2)], 1.25),
        ),
    ]
}

/// Renders the reference set with one seeded generator, in order.
pub fn render_reference_set(seed: u64) -> Vec<(&'static str, Vec<f32>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let len = REFERENCE_SAMPLE_RATE_HZ as usize * REFERENCE_SECONDS;
    reference_signals()
        .into_iter()
        .map(|(name, signal)| (name, signal.render(REFERENCE_SAMPLE_RATE_HZ, len, &mut rng)))
        .collect()
}

/// Writes `<name>.csv` for every reference signal into `dir`.
pub fn write_reference_set(dir: impl AsRef<Path>, seed: u64) -> Result<Vec<PathBuf>, SignalError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| SignalError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    render_reference_set(seed)
        .into_iter()
        .map(|(name, samples)| write_samples_csv(dir.join(format!("{name}.csv")), &samples))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{relative_band_powers, SampleSeries, SpectrumBuilder};
    use crate::model::dominance_ratio;
    use crate::types::{Band, BandFeatures};

    fn features_of(samples: Vec<f32>) -> BandFeatures {
        let series = SampleSeries::new(REFERENCE_SAMPLE_RATE_HZ, samples).unwrap();
        relative_band_powers(&SpectrumBuilder::default().compute(&series))
    }

    #[test]
    fn dominant_signals_land_in_their_band() {
        let expected = [
            ("delta_dominant", Band::Delta),
            ("theta_dominant", Band::Theta),
            ("alpha_dominant", Band::Alpha),
            ("beta_dominant", Band::Beta),
            ("gamma_dominant", Band::Gamma),
        ];
        let rendered = render_reference_set(0);
        for (name, band) in expected {
            let (_, samples) = rendered.iter().find(|(n, _)| *n == name).unwrap();
            let features = features_of(samples.clone());
            assert_eq!(features.dominant_band(), band, "{name}: {features}");
            assert!(dominance_ratio(&features) >= 1.5, "{name}: {features}");
        }
    }

    #[test]
    fn mixed_signal_is_ambiguous() {
        let rendered = render_reference_set(0);
        let (_, samples) = rendered
            .iter()
            .find(|(n, _)| *n == "mixed_alpha_beta")
            .unwrap();
        assert!(dominance_ratio(&features_of(samples.clone())) < 1.5);
    }

    #[test]
    fn noise_free_signal_is_a_pure_sinusoid() {
        let signal = SyntheticSignal::new(&[(8.0, 2.0)], 0.0);
        let samples = signal.render(64.0, 64, &mut StdRng::seed_from_u64(3));
        let mean_square = samples.iter().map(|&v| v * v).sum::<f32>() / samples.len() as f32;
        assert!((mean_square - 2.0).abs() < 1e-3, "mean square {mean_square}");
        // 8 Hz at 64 Hz repeats every 8 samples
        for n in 8..64 {
            assert!((samples[n] - samples[n - 8]).abs() < 1e-4);
        }
    }

    #[test]
    fn noise_has_requested_spread() {
        let signal = SyntheticSignal::new(&[], 0.5);
        let samples = signal.render(256.0, 20_000, &mut StdRng::seed_from_u64(11));
        let n = samples.len() as f64;
        let mean = samples.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = samples.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.02, "mean {mean}");
        assert!((var.sqrt() - 0.5).abs() < 0.02, "std {}", var.sqrt());
    }

    #[test]
    fn same_seed_same_samples() {
        assert_eq!(render_reference_set(7), render_reference_set(7));
        assert_ne!(render_reference_set(7), render_reference_set(8));
    }

    #[test]
    fn reference_set_is_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_reference_set(dir.path().join("tests"), 0).unwrap();
        assert_eq!(paths.len(), 7);
        assert!(paths.iter().all(|p| p.exists()));
        assert!(paths[0].ends_with("delta_dominant.csv"));
    }
}
