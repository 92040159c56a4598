//! Prediction and the low-confidence / mixed-spectrum check.
use crate::config::{DecisionPolicy, CLASS_COUNT, POWER_EPSILON};
use crate::model::ClassifierError;
use crate::types::{Band, BandFeatures, Decision};

/// Ratio of the largest to the second-largest relative band power.
pub fn dominance_ratio(features: &BandFeatures) -> f32 {
    let mut sorted = features.to_array();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted[0] / (sorted[1] + POWER_EPSILON as f32)
}

/// Takes the argmax of the first five probabilities (lowest index on ties)
/// and flags the result when either the model or the spectrum is unsure.
pub fn evaluate(
    features: &BandFeatures,
    probabilities: &[f32],
    policy: &DecisionPolicy,
) -> Result<Decision, ClassifierError> {
    if probabilities.len() < CLASS_COUNT {
        return Err(ClassifierError::TooFewProbabilities {
            expected: CLASS_COUNT,
            actual: probabilities.len(),
        });
    }
    let mut best = 0;
    for idx in 1..CLASS_COUNT {
        if probabilities[idx] > probabilities[best] {
            best = idx;
        }
    }
    let top_probability = probabilities[best];
    let dominance_ratio = dominance_ratio(features);
    let uncertain = top_probability < policy.min_top_probability
        || dominance_ratio < policy.min_dominance_ratio;

    Ok(Decision {
        predicted: Band::ALL[best],
        top_probability,
        dominance_ratio,
        uncertain,
    })
}
