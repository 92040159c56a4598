//! Picks the probability output out of an arbitrary set of model outputs.
//!
//! Exported classifiers often emit a label tensor next to the probability
//! tensor, in no fixed order and under no fixed name. Each float output with
//! at least two values is scored on its name and shape; the highest score
//! wins and the earliest output wins a tie.
use crate::config::CLASS_COUNT;
use crate::model::gateway::RawOutput;
use crate::model::ClassifierError;

const NAME_HINT: &str = "prob";
const SCORE_NAME_HINT: u32 = 4;
const SCORE_EXACT_CLASSES: u32 = 3;
const SCORE_ENOUGH_CLASSES: u32 = 2;

/// Score of one output, or `None` if it cannot hold probabilities.
pub fn score_output(output: &RawOutput) -> Option<u32> {
    if !output.element_type.is_float() || output.element_count < 2 {
        return None;
    }
    let mut score = 0;
    if output.name.to_lowercase().contains(NAME_HINT) {
        score += SCORE_NAME_HINT;
    }
    if output.element_count == CLASS_COUNT {
        score += SCORE_EXACT_CLASSES;
    }
    if output.element_count >= CLASS_COUNT {
        score += SCORE_ENOUGH_CLASSES;
    }
    Some(score)
}

/// Index of the best-scoring output.
pub fn select_output(outputs: &[RawOutput]) -> Result<usize, ClassifierError> {
    let mut best: Option<(usize, u32)> = None;
    for (idx, output) in outputs.iter().enumerate() {
        let Some(score) = score_output(output) else {
            log::debug!("skipping output `{}` ({:?})", output.name, output.element_type);
            continue;
        };
        log::debug!("output `{}` scored {score}", output.name);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
        .ok_or(ClassifierError::NoProbabilityOutput)
}

/// First `min(len, 5)` values of the selected output.
pub fn select_probabilities(outputs: &[RawOutput]) -> Result<Vec<f32>, ClassifierError> {
    let idx = select_output(outputs)?;
    let chosen = &outputs[idx];
    let take = chosen.element_count.min(CLASS_COUNT);
    log::debug!("using output `{}` ({} values)", chosen.name, chosen.element_count);
    Ok(chosen.values.iter().copied().take(take).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::gateway::ElementType;

    #[test]
    fn named_probability_tensor_wins() {
        let outputs = vec![
            RawOutput::opaque("output_label", ElementType::Int64, 1),
            RawOutput::float("aux", vec![0.2, 0.3, 0.5]),
            RawOutput::float("probabilities", vec![0.1, 0.2, 0.4, 0.2, 0.1]),
        ];
        assert_eq!(score_output(&outputs[0]), None);
        assert_eq!(score_output(&outputs[1]), Some(0));
        assert_eq!(score_output(&outputs[2]), Some(9));
        assert_eq!(
            select_probabilities(&outputs).unwrap(),
            vec![0.1, 0.2, 0.4, 0.2, 0.1]
        );
    }

    #[test]
    fn tie_keeps_first_output() {
        let outputs = vec![
            RawOutput::float("logits", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            RawOutput::float("scores", vec![0.2; 5]),
        ];
        assert_eq!(select_output(&outputs).unwrap(), 0);
    }

    #[test]
    fn name_match_ignores_case() {
        let output = RawOutput::float("Output_PROBABILITY", vec![0.5, 0.5]);
        assert_eq!(score_output(&output), Some(4));
    }

    #[test]
    fn longer_output_is_truncated_to_class_count() {
        let outputs = vec![RawOutput::float("probs", (0..8).map(|i| i as f32).collect())];
        assert_eq!(score_output(&outputs[0]), Some(6));
        assert_eq!(
            select_probabilities(&outputs).unwrap(),
            vec![0.0, 1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn short_output_is_returned_whole() {
        let outputs = vec![RawOutput::float("probs", vec![0.7, 0.3])];
        assert_eq!(select_probabilities(&outputs).unwrap(), vec![0.7, 0.3]);
    }

    #[test]
    fn float64_outputs_qualify() {
        let mut output = RawOutput::float("y", vec![0.1, 0.9]);
        output.element_type = ElementType::Float64;
        assert_eq!(score_output(&output), Some(0));
    }

    #[test]
    fn no_float_output_is_an_error() {
        let outputs = vec![
            RawOutput::opaque("label", ElementType::Int64, 1),
            RawOutput::opaque("zipmap", ElementType::NonTensor, 0),
            RawOutput::float("single", vec![1.0]),
        ];
        assert!(matches!(
            select_probabilities(&outputs),
            Err(ClassifierError::NoProbabilityOutput)
        ));
        assert!(matches!(
            select_output(&[]),
            Err(ClassifierError::NoProbabilityOutput)
        ));
    }
}
