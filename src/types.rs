// src/types.rs
use serde::Serialize;

use crate::config::CLASS_COUNT;

/// Frequency bands, in feature-vector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

impl Band {
    pub const ALL: [Band; CLASS_COUNT] = [
        Band::Delta,
        Band::Theta,
        Band::Alpha,
        Band::Beta,
        Band::Gamma,
    ];

    pub const fn index(self) -> usize {
        match self {
            Band::Delta => 0,
            Band::Theta => 1,
            Band::Alpha => 2,
            Band::Beta => 3,
            Band::Gamma => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Band::Delta => "delta",
            Band::Theta => "theta",
            Band::Alpha => "alpha",
            Band::Beta => "beta",
            Band::Gamma => "gamma",
        }
    }

    /// Half-open `[lo, hi)` range in Hz.
    pub const fn range_hz(self) -> (f64, f64) {
        match self {
            Band::Delta => (1.0, 4.0),
            Band::Theta => (4.0, 8.0),
            Band::Alpha => (8.0, 13.0),
            Band::Beta => (13.0, 30.0),
            Band::Gamma => (30.0, 45.0),
        }
    }

    pub fn contains(self, freq_hz: f64) -> bool {
        let (lo, hi) = self.range_hz();
        freq_hz >= lo && freq_hz < hi
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Relative band power, one value per [`Band`] in `Band::ALL` order.
///
/// Each value is normalised by the same in-range total, so the five values
/// usually sum to at most one but are not forced to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BandFeatures {
    pub delta: f32,
    pub theta: f32,
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl BandFeatures {
    pub fn from_array(values: [f32; CLASS_COUNT]) -> Self {
        let [delta, theta, alpha, beta, gamma] = values;
        Self {
            delta,
            theta,
            alpha,
            beta,
            gamma,
        }
    }

    pub fn to_array(&self) -> [f32; CLASS_COUNT] {
        [self.delta, self.theta, self.alpha, self.beta, self.gamma]
    }

    pub fn get(&self, band: Band) -> f32 {
        self.to_array()[band.index()]
    }

    /// Band holding the largest relative power (lowest index on ties).
    pub fn dominant_band(&self) -> Band {
        let values = self.to_array();
        let mut best = 0;
        for (idx, value) in values.iter().enumerate().skip(1) {
            if *value > values[best] {
                best = idx;
            }
        }
        Band::ALL[best]
    }
}

impl std::fmt::Display for BandFeatures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.to_array();
        for (idx, band) in Band::ALL.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", band, values[idx])?;
        }
        Ok(())
    }
}

/// Outcome of the confidence check for one classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Decision {
    pub predicted: Band,
    pub top_probability: f32,
    pub dominance_ratio: f32,
    pub uncertain: bool,
}

impl Decision {
    pub fn class_index(&self) -> usize {
        self.predicted.index()
    }
}

/// Full result of one run through the pipeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub features: BandFeatures,
    pub probabilities: [f32; CLASS_COUNT],
    pub decision: Decision,
}
