//! Inference Pipeline - assemble, scale, classify
//!
//! The `Scorer` trait is the seam between form logic and the fitted
//! artifacts: both operations are deterministic for a fixed artifact set, so
//! the same record always yields the same verdict. Tests swap in mock
//! scorers; production wires the loaded scaler and ONNX session together.

use serde::{Deserialize, Serialize};

use crate::logic::features::layout::FEATURE_COUNT;
use crate::logic::features::record::FlowRecord;
use crate::logic::model::{artifacts, inference, Verdict};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct PipelineError(pub String);

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PipelineError: {}", self.0)
    }
}

impl std::error::Error for PipelineError {}

// ============================================================================
// SCORER SEAM
// ============================================================================

/// The fitted scaler + classifier pair, abstracted.
///
/// `normalize` and `classify` both take scaler-ordered columns; callers go
/// through `classify_record` so the reordering cannot be skipped.
pub trait Scorer {
    fn normalize(&self, columns: &[f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT], PipelineError>;
    fn classify(&self, scaled: &[f64; FEATURE_COUNT]) -> Result<i64, PipelineError>;
}

/// Production scorer backed by the loaded artifacts
pub struct ArtifactScorer;

impl Scorer for ArtifactScorer {
    fn normalize(&self, columns: &[f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT], PipelineError> {
        let scaler = artifacts::get_scaler()
            .ok_or_else(|| PipelineError("Scaler not loaded".to_string()))?;
        scaler
            .transform(columns)
            .map_err(|e| PipelineError(e.to_string()))
    }

    fn classify(&self, scaled: &[f64; FEATURE_COUNT]) -> Result<i64, PipelineError> {
        inference::classify(scaled).map_err(|e| PipelineError(e.to_string()))
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// One completed classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: Verdict,
    pub label: i64,
    pub inference_time_us: u64,
}

/// Run one record through the pipeline: reorder into the scaler layout,
/// scale, classify, map the label.
///
/// Errors abort this classification only; the loaded artifacts and every
/// other session are untouched.
pub fn classify_record(scorer: &dyn Scorer, record: &FlowRecord) -> Result<Classification, PipelineError> {
    record
        .validate()
        .map_err(|e| PipelineError(e.to_string()))?;

    let start_time = std::time::Instant::now();

    let columns = record.assemble();
    let scaled = scorer.normalize(&columns)?;
    let label = scorer.classify(&scaled)?;

    Ok(Classification {
        verdict: Verdict::from_label(label),
        label,
        inference_time_us: start_time.elapsed().as_micros() as u64,
    })
}

/// Classify with the production artifacts
pub fn classify_with_artifacts(record: &FlowRecord) -> Result<Classification, PipelineError> {
    classify_record(&ArtifactScorer, record)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::presets;
    use crate::logic::model::BannerTone;

    /// Identity scaling, fixed label
    struct FixedScorer {
        label: i64,
    }

    impl Scorer for FixedScorer {
        fn normalize(&self, columns: &[f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT], PipelineError> {
            Ok(*columns)
        }

        fn classify(&self, _scaled: &[f64; FEATURE_COUNT]) -> Result<i64, PipelineError> {
            Ok(self.label)
        }
    }

    /// Identity scaling, labels by the first scaler column
    struct SpyScorer;

    impl Scorer for SpyScorer {
        fn normalize(&self, columns: &[f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT], PipelineError> {
            Ok(*columns)
        }

        fn classify(&self, scaled: &[f64; FEATURE_COUNT]) -> Result<i64, PipelineError> {
            Ok(if scaled[0] > 1000.0 { 1 } else { 0 })
        }
    }

    struct FailingScorer;

    impl Scorer for FailingScorer {
        fn normalize(&self, _columns: &[f64; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT], PipelineError> {
            Err(PipelineError("column count mismatch".to_string()))
        }

        fn classify(&self, _scaled: &[f64; FEATURE_COUNT]) -> Result<i64, PipelineError> {
            unreachable!("classify must not run after a failed normalize")
        }
    }

    #[test]
    fn test_label_zero_maps_to_normal_banner() {
        let result = classify_record(&FixedScorer { label: 0 }, &FlowRecord::new()).unwrap();
        assert_eq!(result.verdict, Verdict::Normal);
        assert_eq!(result.verdict.banner(), "Prediction: Normal");
        assert_eq!(result.verdict.tone(), BannerTone::Success);
    }

    #[test]
    fn test_label_one_maps_to_attack_banner() {
        let result = classify_record(&FixedScorer { label: 1 }, &FlowRecord::new()).unwrap();
        assert_eq!(result.verdict, Verdict::Attack);
        assert_eq!(result.verdict.banner(), "Prediction: DDoS Attack");
        assert_eq!(result.verdict.tone(), BannerTone::Error);
    }

    #[test]
    fn test_all_zero_record_classifies() {
        // The default form state must go through the pipeline without error
        let result = classify_record(&SpyScorer, &FlowRecord::new()).unwrap();
        assert_eq!(result.verdict, Verdict::Normal);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let record = presets::preset("Example 1").unwrap().to_record();
        let first = classify_record(&SpyScorer, &record).unwrap();
        let second = classify_record(&SpyScorer, &record).unwrap();
        assert_eq!(first.verdict, second.verdict);
        assert_eq!(first.label, second.label);
    }

    #[test]
    fn test_scaled_input_follows_scaler_order() {
        // Example 1 has bytecount ~1.4e8; SpyScorer labels on column 0,
        // which is bytecount only if assemble() used the scaler order.
        let record = presets::preset("Example 1").unwrap().to_record();
        let result = classify_record(&SpyScorer, &record).unwrap();
        assert_eq!(result.verdict, Verdict::Attack);
    }

    #[test]
    fn test_example_2_zero_subfields_do_not_error() {
        let record = presets::preset("Example 2").unwrap().to_record();
        let result = classify_record(&SpyScorer, &record);
        assert!(result.is_ok());
    }

    #[test]
    fn test_normalize_error_aborts_classification() {
        let err = classify_record(&FailingScorer, &FlowRecord::new()).unwrap_err();
        assert!(err.to_string().contains("column count mismatch"));
    }

    #[test]
    fn test_artifact_scorer_without_artifacts() {
        if artifacts::get_scaler().is_some() {
            // Another test loaded real artifacts into this process
            return;
        }
        let err = ArtifactScorer.normalize(&[0.0; FEATURE_COUNT]).unwrap_err();
        assert!(err.to_string().contains("Scaler not loaded"));
    }

    #[test]
    fn test_example_1_golden_label_against_shipped_artifacts() {
        // Regression against the fitted artifact trio. The model artifact
        // comes out of the training pipeline and is not committed, so this
        // only runs where a real artifact directory is available.
        let dir = artifacts::resolve_artifact_dir();
        if !dir.join(crate::constants::MODEL_FILE).exists() {
            return;
        }
        artifacts::load_all(&dir).unwrap();

        let record = presets::preset("Example 1").unwrap().to_record();
        let first = classify_with_artifacts(&record).unwrap();
        let second = classify_with_artifacts(&record).unwrap();

        // Binary classifier, deterministic for fixed artifacts
        assert!(first.label == 0 || first.label == 1);
        assert_eq!(first.label, second.label);
        assert_eq!(first.verdict, second.verdict);
    }
}
