//! Band power aggregation over a one-sided spectrum.
use crate::config::{CLASS_COUNT, POWER_EPSILON, TOTAL_POWER_RANGE_HZ};
use crate::dsp::Spectrum;
use crate::types::{Band, BandFeatures};

/// Sum of `power[i]` over bins with `lo <= freq[i] < hi`.
pub fn band_power(frequencies_hz: &[f64], power: &[f64], lo: f64, hi: f64) -> f64 {
    frequencies_hz
        .iter()
        .zip(power)
        .filter(|(freq, _)| **freq >= lo && **freq < hi)
        .map(|(_, p)| *p)
        .sum()
}

/// Absolute power per band plus the normalisation total, before division.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandPowers {
    pub bands: [f64; CLASS_COUNT],
    pub total: f64,
}

impl BandPowers {
    pub fn from_spectrum(spectrum: &Spectrum) -> Self {
        let mut bands = [0.0; CLASS_COUNT];
        for band in Band::ALL {
            let (lo, hi) = band.range_hz();
            bands[band.index()] = band_power(&spectrum.frequencies_hz, &spectrum.power, lo, hi);
        }
        let (lo, hi) = TOTAL_POWER_RANGE_HZ;
        let total = band_power(&spectrum.frequencies_hz, &spectrum.power, lo, hi);
        Self { bands, total }
    }

    /// Each band divided by `total + ε`; no renormalisation to sum to one.
    pub fn relative(&self) -> BandFeatures {
        let denom = self.total + POWER_EPSILON;
        BandFeatures::from_array(self.bands.map(|p| (p / denom) as f32))
    }
}

pub fn relative_band_powers(spectrum: &Spectrum) -> BandFeatures {
    BandPowers::from_spectrum(spectrum).relative()
}
