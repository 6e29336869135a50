//! Preset Examples - Predefined flow records for one-click form fill
//!
//! Four fully-populated examples matching the fitted model's training data
//! scale. Applying one overwrites every field of the live record at once.

use serde::{Deserialize, Serialize};
use super::layout::FEATURE_COUNT;
use super::record::FlowRecord;

/// One named preset: values in INPUT_FIELDS order
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub values: [f64; FEATURE_COUNT],
}

/// The four shipped examples.
/// Values in INPUT_FIELDS order:
/// bytecount, pktcount, dur, tot_dur, packetins, pktperflow, byteperflow, pktrate, dt, tx_bytes
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Example 1",
        values: [143_891_878.0, 134_983.0, 313.0, 3.11e11, 1931.0, 7570.0, 8_069_620.0, 292.0, 10146.0, 3609.0],
    },
    Preset {
        name: "Example 2",
        values: [1_000_000_000.0, 100_000.0, 0.0, 3.11e11, 1.0, 30.0, 0.0, 10.0, 0.0, 1000.0],
    },
    Preset {
        name: "Example 3",
        values: [5000.0, 1_000_000.0, 0.0, 3_000_000.0, 50.0, 10.0, 200.0, 2.0, 11776.0, 3000.0],
    },
    Preset {
        name: "Example 4",
        values: [10000.0, 200.0, 500_000.0, 6_000_000.0, 400.0, 20.0, 500.0, 5.0, 11976.0, 6000.0],
    },
];

/// Find preset by name
pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Preset names in button order
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}

impl Preset {
    /// Materialize the preset as a full record
    pub fn to_record(&self) -> FlowRecord {
        FlowRecord::from_values(self.values)
    }
}

/// Preset summary for the frontend button row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub values: Vec<f64>,
}

impl From<&Preset> for PresetInfo {
    fn from(p: &Preset) -> Self {
        Self {
            name: p.name.to_string(),
            values: p.values.to_vec(),
        }
    }
}
