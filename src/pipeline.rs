// src/pipeline.rs
use crate::config::{DecisionPolicy, SpectrumMethod, CLASS_COUNT};
use crate::dsp::{relative_band_powers, SampleSeries, SignalSource, Spectrum, SpectrumBuilder};
use crate::model::{
    evaluate, run_benchmark, select_probabilities, BenchmarkReport, ClassifierError,
    ClassifierGateway,
};
use crate::types::{BandFeatures, Classification};
/// Samples in, band decision out. Owns the gateway for its whole lifetime.
pub struct ClassificationPipeline<G: ClassifierGateway> {
    gateway: G,
    spectrum: SpectrumBuilder,
    policy: DecisionPolicy,
}
impl<G: ClassifierGateway> ClassificationPipeline<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            spectrum: SpectrumBuilder::default(),
            policy: DecisionPolicy::default(),
        }
    }
    pub fn with_method(mut self, method: SpectrumMethod) -> Self {
        self.spectrum = SpectrumBuilder::with_method(method);
        self
    }
    pub fn with_policy(mut self, policy: DecisionPolicy) -> Self {
        self.policy = policy;
        self
    }
    pub fn gateway(&self) -> &G {
        &self.gateway
    }
    pub fn into_gateway(self) -> G {
        self.gateway
    }
    pub fn spectrum(&self, series: &SampleSeries) -> Result<Spectrum, ClassifierError> {
        series.validate()?;
        Ok(self.spectrum.compute(series))
    }
    pub fn extract_features(&self, series: &SampleSeries) -> Result<BandFeatures, ClassifierError> {
        let spectrum = self.spectrum(series)?;
        Ok(relative_band_powers(&spectrum))
    }
    /// Runs the gateway once and returns up to five selected probabilities.
    pub fn predict_proba(&mut self, features: &[f32]) -> Result<Vec<f32>, ClassifierError> {
        if features.len() != CLASS_COUNT {
            return Err(ClassifierError::FeatureLength {
                expected: CLASS_COUNT,
                actual: features.len(),
            });
        }
        let outputs = self.gateway.run(features)?;
        select_probabilities(&outputs)
    }
    pub fn classify_features(
        &mut self,
        features: BandFeatures,
    ) -> Result<Classification, ClassifierError> {
        let probabilities = self.predict_proba(&features.to_array())?;
        let decision = evaluate(&features, &probabilities, &self.policy)?;
        if decision.uncertain {
            log::warn!(
                "low confidence / mixed spectrum: top_prob={}, dominance_ratio={}",
                decision.top_probability,
                decision.dominance_ratio
            );
        }
        let mut fixed = [0.0; CLASS_COUNT];
        fixed.copy_from_slice(&probabilities[..CLASS_COUNT]);
        Ok(Classification {
            features,
            probabilities: fixed,
            decision,
        })
    }
    pub fn classify(&mut self, series: &SampleSeries) -> Result<Classification, ClassifierError> {
        let features = self.extract_features(series)?;
        self.classify_features(features)
    }
    /// Pulls the next segment from `source` and classifies it.
    pub fn pump_once<S: SignalSource>(
        &mut self,
        source: &mut S,
    ) -> Result<Option<Classification>, ClassifierError> {
        let Some(series) = source.next_series()? else {
            return Ok(None);
        };
        self.classify(&series).map(Some)
    }
    /// Times the feature-to-probability call `runs` times after a warm-up.
    pub fn benchmark(
        &mut self,
        features: &BandFeatures,
        runs: usize,
    ) -> Result<Option<BenchmarkReport>, ClassifierError> {
        let features = features.to_array();
        run_benchmark(runs, || self.predict_proba(&features))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BENCHMARK_WARMUP_RUNS;
    use crate::dsp::ManualSource;
    use crate::model::{ElementType, RawOutput, StaticGateway};
    use crate::types::Band;
    fn alpha_series() -> SampleSeries {
        let fs = 256.0f32;
        let samples = (0..256)
            .map(|n| (std::f32::consts::TAU * 10.0 * n as f32 / fs).sin())
            .collect();
        SampleSeries::new(fs, samples).unwrap()
    }
    fn sklearn_like(probabilities: Vec<f32>) -> StaticGateway {
        StaticGateway::new(vec![
            RawOutput::opaque("output_label", ElementType::Int64, 1),
            RawOutput::float("output_probability", probabilities),
        ])
    }
    #[test]
    fn classifies_alpha_sine() {
        let gateway = sklearn_like(vec![0.02, 0.03, 0.9, 0.03, 0.02]);
        let mut pipeline = ClassificationPipeline::new(gateway);
        let result = pipeline.classify(&alpha_series()).unwrap();
        assert!(result.features.alpha > 0.9);
        assert_eq!(result.features.dominant_band(), Band::Alpha);
        assert_eq!(result.decision.predicted, Band::Alpha);
        assert_eq!(result.probabilities, [0.02, 0.03, 0.9, 0.03, 0.02]);
        assert!(!result.decision.uncertain);
        assert_eq!(pipeline.gateway().calls(), 1);
    }
    #[test]
    fn short_probability_output_is_reported() {
        let mut pipeline = ClassificationPipeline::new(sklearn_like(vec![0.6, 0.4]));
        let err = pipeline.classify(&alpha_series()).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::TooFewProbabilities {
                expected: 5,
                actual: 2
            }
        ));
    }
    #[test]
    fn wrong_feature_length_never_reaches_gateway() {
        let mut pipeline = ClassificationPipeline::new(sklearn_like(vec![0.2; 5]));
        let err = pipeline.predict_proba(&[0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::FeatureLength {
                expected: 5,
                actual: 3
            }
        ));
        assert_eq!(pipeline.gateway().calls(), 0);
    }
    #[test]
    fn missing_probability_output_is_fatal() {
        let gateway = StaticGateway::new(vec![RawOutput::opaque("label", ElementType::Int64, 1)]);
        let mut pipeline = ClassificationPipeline::new(gateway);
        assert!(matches!(
            pipeline.classify(&alpha_series()),
            Err(ClassifierError::NoProbabilityOutput)
        ));
    }
    #[test]
    fn direct_and_fft_features_agree() {
        let series = alpha_series();
        let direct = ClassificationPipeline::new(sklearn_like(vec![0.2; 5]))
            .extract_features(&series)
            .unwrap();
        let fast = ClassificationPipeline::new(sklearn_like(vec![0.2; 5]))
            .with_method(SpectrumMethod::Fft)
            .extract_features(&series)
            .unwrap();
        for (a, b) in direct.to_array().iter().zip(fast.to_array()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
    #[test]
    fn pump_once_drains_source() {
        let mut source = ManualSource::new(vec![alpha_series()]);
        let mut pipeline = ClassificationPipeline::new(sklearn_like(vec![0.1, 0.1, 0.6, 0.1, 0.1]));
        assert!(pipeline.pump_once(&mut source).unwrap().is_some());
        assert!(pipeline.pump_once(&mut source).unwrap().is_none());
    }
    #[test]
    fn benchmark_counts_warmup_and_timed_calls() {
        let mut pipeline = ClassificationPipeline::new(sklearn_like(vec![0.2; 5]));
        let features = BandFeatures::from_array([0.2; 5]);
        let report = pipeline.benchmark(&features, 20).unwrap().unwrap();
        assert_eq!(report.runs, 20);
        assert_eq!(pipeline.gateway().calls(), BENCHMARK_WARMUP_RUNS + 20);
        assert!(pipeline.benchmark(&features, 0).unwrap().is_none());
    }
    #[test]
    fn invalid_series_is_rejected_before_inference() {
        let mut pipeline = ClassificationPipeline::new(sklearn_like(vec![0.2; 5]));
        let series = SampleSeries {
            sample_rate_hz: -1.0,
            samples: vec![0.0; 8],
        };
        assert!(matches!(
            pipeline.classify(&series),
            Err(ClassifierError::Signal(_))
        ));
        assert_eq!(pipeline.into_gateway().calls(), 0);
    }
}
