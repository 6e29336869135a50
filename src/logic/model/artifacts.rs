//! Artifact Store - Startup loading of the three fitted artifacts
//!
//! `scaler.json`, `label_encoders.json` and `model.onnx` live together in one
//! artifact directory. All three are loaded exactly once at process start and
//! are read-only afterwards; a missing or corrupt file is fatal, there is no
//! retry and no partial operation.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants;
use super::encoders::LabelEncoders;
use super::inference;
use super::scaler::ScalerParams;

// ============================================================================
// STATE
// ============================================================================

/// Fitted scaler parameters
static SCALER: RwLock<Option<ScalerParams>> = RwLock::new(None);

/// Fitted label encoders (vestigial, see module docs in `encoders`)
static ENCODERS: RwLock<Option<LabelEncoders>> = RwLock::new(None);

/// Load manifest for the status command
static MANIFEST: RwLock<Option<ArtifactManifest>> = RwLock::new(None);

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// What was loaded, from where, and its integrity digests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub artifact_dir: String,
    pub scaler_sha256: String,
    pub encoders_sha256: String,
    pub model_sha256: String,
    pub encoder_count: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct ArtifactError(pub String);

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArtifactError: {}", self.0)
    }
}

impl std::error::Error for ArtifactError {}

// ============================================================================
// LOADING
// ============================================================================

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|e| ArtifactError(format!("Cannot read {}: {}", path.display(), e)))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Parse and layout-validate the scaler artifact
pub fn load_scaler_file(path: &Path) -> Result<(ScalerParams, String), ArtifactError> {
    let bytes = read_artifact(path)?;
    let params: ScalerParams = serde_json::from_slice(&bytes)
        .map_err(|e| ArtifactError(format!("Corrupt scaler artifact {}: {}", path.display(), e)))?;
    params
        .validate()
        .map_err(|e| ArtifactError(format!("Scaler artifact {}: {}", path.display(), e)))?;
    Ok((params, sha256_hex(&bytes)))
}

/// Parse the label-encoder artifact
pub fn load_encoders_file(path: &Path) -> Result<(LabelEncoders, String), ArtifactError> {
    let bytes = read_artifact(path)?;
    let encoders: LabelEncoders = serde_json::from_slice(&bytes)
        .map_err(|e| ArtifactError(format!("Corrupt encoder artifact {}: {}", path.display(), e)))?;
    Ok((encoders, sha256_hex(&bytes)))
}

/// Load all three artifacts from one directory.
///
/// Nothing is stored unless every artifact loads; a failure part-way leaves
/// the process unable to serve, which is what startup wants.
pub fn load_all(dir: &Path) -> Result<(), ArtifactError> {
    log::info!("Loading artifacts from: {}", dir.display());

    let (scaler, scaler_sha256) = load_scaler_file(&dir.join(constants::SCALER_FILE))?;
    let (encoders, encoders_sha256) = load_encoders_file(&dir.join(constants::ENCODERS_FILE))?;

    let model_path = dir.join(constants::MODEL_FILE);
    let model_bytes = read_artifact(&model_path)?;
    let model_sha256 = sha256_hex(&model_bytes);
    inference::load_model_from_bytes(&model_bytes)
        .map_err(|e| ArtifactError(format!("Classifier artifact {}: {}", model_path.display(), e)))?;

    let encoder_count = encoders.len();
    *SCALER.write() = Some(scaler);
    *ENCODERS.write() = Some(encoders);
    *MANIFEST.write() = Some(ArtifactManifest {
        artifact_dir: dir.display().to_string(),
        scaler_sha256,
        encoders_sha256,
        model_sha256,
        encoder_count,
        loaded_at: chrono::Utc::now(),
    });

    log::info!("All artifacts loaded ({} label encoders, unused by prediction)", encoder_count);
    Ok(())
}

/// Resolve the artifact directory and load everything
pub fn init() -> Result<(), ArtifactError> {
    let dir = resolve_artifact_dir();
    load_all(&dir)
}

/// Artifact directory resolution order: env override, per-user data dir,
/// bundled `artifacts/` next to the executable's working directory.
pub fn resolve_artifact_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(constants::ARTIFACT_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(data_dir) = dirs::data_dir() {
        let candidate = data_dir.join(constants::APP_DIR_NAME).join("artifacts");
        if candidate.join(constants::MODEL_FILE).exists() {
            return candidate;
        }
    }

    PathBuf::from(constants::DEFAULT_ARTIFACT_DIR)
}

// ============================================================================
// ACCESSORS
// ============================================================================

/// Get the fitted scaler (None before init)
pub fn get_scaler() -> Option<ScalerParams> {
    SCALER.read().clone()
}

/// Get the load manifest (None before init)
pub fn get_manifest() -> Option<ArtifactManifest> {
    MANIFEST.read().clone()
}

/// Compare a recorded artifact digest against an expected hex digest
pub fn verify_checksum(artifact: &str, expected_hex: &str) -> Result<bool, ArtifactError> {
    let manifest = MANIFEST.read();
    let manifest = manifest
        .as_ref()
        .ok_or_else(|| ArtifactError("Artifacts not loaded".to_string()))?;

    let recorded = match artifact {
        "scaler" => &manifest.scaler_sha256,
        "encoders" => &manifest.encoders_sha256,
        "model" => &manifest.model_sha256,
        other => return Err(ArtifactError(format!("Unknown artifact: {}", other))),
    };

    Ok(recorded.eq_ignore_ascii_case(expected_hex))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::{FEATURE_COUNT, SCALER_LAYOUT};
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn scaler_json() -> String {
        let columns: Vec<String> = SCALER_LAYOUT.iter().map(|s| format!("\"{}\"", s)).collect();
        format!(
            "{{\"columns\": [{}], \"mean\": {:?}, \"scale\": {:?}}}",
            columns.join(", "),
            vec![0.0; FEATURE_COUNT],
            vec![1.0; FEATURE_COUNT],
        )
    }

    #[test]
    fn test_load_scaler_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "scaler.json", &scaler_json());

        let (params, digest) = load_scaler_file(&path).unwrap();
        assert_eq!(params.columns.len(), FEATURE_COUNT);
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_load_scaler_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_scaler_file(&dir.path().join("scaler.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }

    #[test]
    fn test_load_scaler_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "scaler.json", "{not json");
        let err = load_scaler_file(&path).unwrap_err();
        assert!(err.to_string().contains("Corrupt"));
    }

    #[test]
    fn test_load_scaler_rejects_wrong_columns() {
        let dir = tempfile::tempdir().unwrap();
        let bad = scaler_json().replace("\"bytecount\"", "\"flowcount\"");
        let path = write_file(dir.path(), "scaler.json", &bad);
        assert!(load_scaler_file(&path).is_err());
    }

    #[test]
    fn test_load_encoders_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "label_encoders.json",
            r#"{"protocol": ["ICMP", "TCP", "UDP"]}"#,
        );

        let (encoders, digest) = load_encoders_file(&path).unwrap();
        assert_eq!(encoders.len(), 1);
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_load_all_fails_without_model() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "scaler.json", &scaler_json());
        write_file(dir.path(), "label_encoders.json", "{}");

        // No model.onnx: whole load fails, nothing may be half-initialized
        assert!(load_all(dir.path()).is_err());
    }

    #[test]
    fn test_verify_checksum_unknown_artifact() {
        if resolve_artifact_dir().join(crate::constants::MODEL_FILE).exists() {
            // A real artifact set may own the manifest in this process
            return;
        }
        *MANIFEST.write() = Some(ArtifactManifest {
            artifact_dir: ".".to_string(),
            scaler_sha256: "ab".repeat(32),
            encoders_sha256: "cd".repeat(32),
            model_sha256: "ef".repeat(32),
            encoder_count: 0,
            loaded_at: chrono::Utc::now(),
        });

        assert!(verify_checksum("weights", "00").is_err());
        assert!(verify_checksum("scaler", &"ab".repeat(32)).unwrap());
        assert!(!verify_checksum("model", &"00".repeat(32)).unwrap());
    }
}
