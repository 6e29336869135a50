//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the fitted classifier and runs single-row predictions.
//! The session is process-wide, read-mostly, and never mutated after load.

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array2;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;

use crate::logic::features::layout::FEATURE_COUNT;

// ============================================================================
// STATE
// ============================================================================

/// Latency stats
static LATENCY_SUM: AtomicU64 = AtomicU64::new(0);
static INFERENCE_COUNT: AtomicU64 = AtomicU64::new(0);

/// ONNX Session (loaded classifier)
static ONNX_SESSION: RwLock<Option<Session>> = RwLock::new(None);

/// Model metadata
static MODEL_METADATA: RwLock<Option<ModelMetadata>> = RwLock::new(None);

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub features: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Engine status for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub inference_device: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// MODEL LOADING
// ============================================================================

/// Load the classifier from file
pub fn load_model(model_path: &str) -> Result<(), InferenceError> {
    log::info!("Loading classifier from: {}", model_path);

    if !std::path::Path::new(model_path).exists() {
        return Err(InferenceError(format!("Model not found: {}", model_path)));
    }

    let session = Session::builder()
        .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
        .commit_from_file(model_path)
        .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

    log::info!("Classifier loaded successfully");

    *ONNX_SESSION.write() = Some(session);
    *MODEL_METADATA.write() = Some(ModelMetadata {
        model_path: model_path.to_string(),
        model_type: "random_forest".to_string(),
        features: FEATURE_COUNT,
        loaded_at: chrono::Utc::now(),
    });

    Ok(())
}

/// Load the classifier from bytes
pub fn load_model_from_bytes(model_bytes: &[u8]) -> Result<(), InferenceError> {
    log::info!("Loading classifier from memory ({} bytes)", model_bytes.len());

    let session = Session::builder()
        .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
        .commit_from_memory(model_bytes)
        .map_err(|e| InferenceError(format!("Failed to load model from memory: {}", e)))?;

    *ONNX_SESSION.write() = Some(session);
    *MODEL_METADATA.write() = Some(ModelMetadata {
        model_path: "<memory>".to_string(),
        model_type: "random_forest".to_string(),
        features: FEATURE_COUNT,
        loaded_at: chrono::Utc::now(),
    });

    Ok(())
}

/// Check if the classifier is loaded
pub fn is_model_loaded() -> bool {
    ONNX_SESSION.read().is_some()
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Run the classifier on one scaled row, returning its integer label.
///
/// 0 means normal traffic; the model is binary so any other label is an
/// attack. Input must already be in the scaler column order.
pub fn classify(scaled: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError> {
    let start_time = std::time::Instant::now();

    let mut session_guard = ONNX_SESSION.write();
    let session = session_guard.as_mut()
        .ok_or_else(|| InferenceError("Model not loaded".to_string()))?;

    // Shape (1, features); the exported graph takes float32
    let input_data: Vec<f32> = scaled.iter().map(|v| *v as f32).collect();
    let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input_data)
        .map_err(|e| InferenceError(format!("Failed to create array: {}", e)))?;

    // Get output name BEFORE run to avoid borrow conflict
    let output_name = session.outputs.first()
        .map(|o| o.name.clone())
        .ok_or_else(|| InferenceError("No output defined".to_string()))?;

    let input_tensor = Value::from_array(input_array)
        .map_err(|e| InferenceError(format!("Failed to create tensor: {}", e)))?;

    let outputs = session.run(ort::inputs![input_tensor])
        .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

    let output = outputs.get(&output_name)
        .ok_or_else(|| InferenceError("No output from model".to_string()))?;

    // sklearn-onnx exports the label output as int64; fall back to float
    // for graphs exported with float labels
    let label = match output.try_extract_tensor::<i64>() {
        Ok(tensor) => {
            let data = tensor.1;
            *data.first()
                .ok_or_else(|| InferenceError("Empty label output".to_string()))?
        }
        Err(_) => {
            let tensor = output.try_extract_tensor::<f32>()
                .map_err(|e| InferenceError(format!("Failed to extract output: {}", e)))?;
            let data = tensor.1;
            data.first()
                .map(|v| v.round() as i64)
                .ok_or_else(|| InferenceError("Empty label output".to_string()))?
        }
    };

    let inference_time = start_time.elapsed().as_micros() as u64;
    LATENCY_SUM.fetch_add(inference_time, Ordering::Relaxed);
    INFERENCE_COUNT.fetch_add(1, Ordering::Relaxed);

    Ok(label)
}

// ============================================================================
// HELPERS
// ============================================================================

pub fn get_status() -> EngineStatus {
    let metadata = MODEL_METADATA.read();
    let (loaded, name) = if let Some(meta) = metadata.as_ref() {
        (true, meta.model_path.clone())
    } else {
        (false, "None".to_string())
    };

    let sum = LATENCY_SUM.load(Ordering::Relaxed);
    let count = INFERENCE_COUNT.load(Ordering::Relaxed);
    let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

    EngineStatus {
        model_loaded: loaded,
        model_name: name,
        inference_device: "ONNX Runtime (CPU)".to_string(),
        avg_latency_ms: avg,
        inference_count: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_without_model_errors() {
        if is_model_loaded() {
            // A real artifact set was loaded into this process
            return;
        }
        let err = classify(&[0.0; FEATURE_COUNT]).unwrap_err();
        assert!(err.to_string().contains("not loaded"));
    }

    #[test]
    fn test_load_missing_model_errors() {
        let err = load_model("/nonexistent/model.onnx").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_status_without_model() {
        if is_model_loaded() {
            return;
        }
        let status = get_status();
        assert!(!status.model_loaded);
        assert_eq!(status.model_name, "None");
    }
}
