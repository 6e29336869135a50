//! Central Configuration Constants
//!
//! Single source of truth for artifact names and directory resolution.
//! To rename an artifact file, only edit this file.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "DDoS Attack Classifier";

/// Directory name under the per-user data dir
pub const APP_DIR_NAME: &str = "DDoSClassifier";

/// Fitted scaler parameters
pub const SCALER_FILE: &str = "scaler.json";

/// Fitted label encoders
pub const ENCODERS_FILE: &str = "label_encoders.json";

/// Fitted classifier
pub const MODEL_FILE: &str = "model.onnx";

/// Env override for the artifact directory
pub const ARTIFACT_DIR_ENV: &str = "DDOS_ARTIFACT_DIR";

/// Fallback artifact directory, relative to the working directory
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";
