//! Verdict - Binary classification outcome and its presentation

use serde::{Deserialize, Serialize};

/// The two traffic classes the fitted model distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Normal,
    Attack,
}

impl Verdict {
    /// Map the classifier's integer label: 0 is normal, anything else is an
    /// attack (the model is binary, so in practice that means 1).
    pub fn from_label(label: i64) -> Self {
        if label == 0 {
            Verdict::Normal
        } else {
            Verdict::Attack
        }
    }

    /// Banner text shown in the result panel
    pub fn banner(&self) -> &'static str {
        match self {
            Verdict::Normal => "Prediction: Normal",
            Verdict::Attack => "Prediction: DDoS Attack",
        }
    }

    /// Banner styling tone for the frontend
    pub fn tone(&self) -> BannerTone {
        match self {
            Verdict::Normal => BannerTone::Success,
            Verdict::Attack => BannerTone::Error,
        }
    }
}

/// How the frontend styles the verdict banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerTone {
    Success,
    Error,
}
