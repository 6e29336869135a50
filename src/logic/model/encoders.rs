//! Label Encoder Artifact
//!
//! The training pipeline ships a set of fitted categorical encoders alongside
//! the scaler and the classifier. The active prediction path is all-numeric
//! and never consults them, but the artifact is still loaded and validated at
//! startup so a corrupt file fails fast like the other two.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fitted encoders: feature name -> ordered class list.
/// Class index in the list is the encoded integer value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoders {
    #[serde(flatten)]
    pub encoders: HashMap<String, Vec<String>>,
}

impl LabelEncoders {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of fitted encoders
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Encode a categorical value, if this feature has a fitted encoder
    pub fn encode(&self, feature: &str, class: &str) -> Option<usize> {
        self.encoders
            .get(feature)?
            .iter()
            .position(|c| c == class)
    }
}
