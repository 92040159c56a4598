// src/config.rs
//! Fixed policy constants and the small amount of runtime configuration the
//! classifier accepts.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::ClassifierError;

/// Number of bands, features and classes.
pub const CLASS_COUNT: usize = 5;
/// Window used to normalise band power, `[lo, hi)` in Hz.
pub const TOTAL_POWER_RANGE_HZ: (f64, f64) = (1.0, 45.0);
/// Added to denominators so silent input never divides by zero.
pub const POWER_EPSILON: f64 = 1e-9;
/// Below this top probability a result is flagged.
pub const MIN_TOP_PROBABILITY: f32 = 0.6;
/// Below this largest/second-largest band ratio a result is flagged.
pub const MIN_DOMINANCE_RATIO: f32 = 1.5;
pub const DEFAULT_SAMPLE_RATE_HZ: f32 = 256.0;
/// Untimed calls before a benchmark starts measuring.
pub const BENCHMARK_WARMUP_RUNS: usize = 10;
/// Percentile reported next to the mean latency.
pub const BENCHMARK_PERCENTILE: f64 = 0.95;

/// Thresholds of the low-confidence / mixed-spectrum check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    pub min_top_probability: f32,
    pub min_dominance_ratio: f32,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            min_top_probability: MIN_TOP_PROBABILITY,
            min_dominance_ratio: MIN_DOMINANCE_RATIO,
        }
    }
}

impl DecisionPolicy {
    /// Reads a JSON object; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::Policy(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
            .map_err(|e| ClassifierError::Policy(format!("{}: {e}", path.display())))
    }

    pub fn from_json_str(text: &str) -> Result<Self, ClassifierError> {
        let policy: Self =
            serde_json::from_str(text).map_err(|e| ClassifierError::Policy(e.to_string()))?;
        if !policy.min_top_probability.is_finite() || !policy.min_dominance_ratio.is_finite() {
            return Err(ClassifierError::Policy(
                "thresholds must be finite numbers".into(),
            ));
        }
        Ok(policy)
    }
}

/// How the power spectrum is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpectrumMethod {
    /// Direct O(N^2) transform over the non-negative bins.
    #[default]
    Direct,
    /// Same bins through rustfft.
    Fft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_policy_uses_fixed_thresholds() {
        let policy = DecisionPolicy::default();
        assert_eq!(policy.min_top_probability, 0.6);
        assert_eq!(policy.min_dominance_ratio, 1.5);
    }

    #[test]
    fn partial_policy_keeps_defaults() {
        let policy = DecisionPolicy::from_json_str(r#"{ "min_top_probability": 0.75 }"#).unwrap();
        assert_eq!(policy.min_top_probability, 0.75);
        assert_eq!(policy.min_dominance_ratio, MIN_DOMINANCE_RATIO);
    }

    #[test]
    fn policy_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "min_dominance_ratio": 2.0 }}"#).unwrap();
        let policy = DecisionPolicy::from_json_file(file.path()).unwrap();
        assert_eq!(policy.min_dominance_ratio, 2.0);
    }

    #[test]
    fn malformed_policy_is_rejected() {
        let err = DecisionPolicy::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ClassifierError::Policy(_)));
    }
}
