//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add field → increment LAYOUT_VERSION
//! 2. Change either order → increment LAYOUT_VERSION
//! 3. Remove field → increment LAYOUT_VERSION
//!
//! Two orders live here and they are NOT the same:
//! - `INPUT_FIELDS` is the order the sidebar presents the fields in.
//! - `SCALER_LAYOUT` is the column order the scaler was fitted on; every
//!   record must be reordered into it before scaling.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// LAYOUT VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when either order changes
pub const LAYOUT_VERSION: u8 = 1;

// ============================================================================
// FIELD DEFINITIONS
// ============================================================================

/// Numeric kind of a field, controls the input widget and step size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Float,
}

/// One bound input field: name, display label, kind, step size.
/// All fields share a minimum bound of 0.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub step: f64,
}

/// Sidebar entry order (the order the original form presents fields in)
pub const INPUT_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "bytecount", label: "Byte Count", kind: FieldKind::Integer, step: 1.0 },
    FieldSpec { name: "pktcount", label: "Packet Count", kind: FieldKind::Integer, step: 1.0 },
    FieldSpec { name: "dur", label: "Duration (in seconds)", kind: FieldKind::Integer, step: 1.0 },
    FieldSpec { name: "tot_dur", label: "Total Duration (in seconds)", kind: FieldKind::Float, step: 1.0 },
    FieldSpec { name: "packetins", label: "Packet In", kind: FieldKind::Integer, step: 1.0 },
    FieldSpec { name: "pktperflow", label: "Packets per Flow", kind: FieldKind::Integer, step: 1.0 },
    FieldSpec { name: "byteperflow", label: "Bytes per Flow", kind: FieldKind::Integer, step: 1.0 },
    FieldSpec { name: "pktrate", label: "Packet Rate", kind: FieldKind::Float, step: 0.1 },
    FieldSpec { name: "dt", label: "Date-Time", kind: FieldKind::Integer, step: 1.0 },
    FieldSpec { name: "tx_bytes", label: "Transmitted Bytes", kind: FieldKind::Integer, step: 1.0 },
];

/// Column order the scaler was fitted on.
/// This is the SINGLE SOURCE OF TRUTH for the model input layout.
pub const SCALER_LAYOUT: &[&str] = &[
    "bytecount",    // 0
    "pktcount",     // 1
    "byteperflow",  // 2
    "pktperflow",   // 3
    "pktrate",      // 4
    "dt",           // 5
    "tot_dur",      // 6
    "tx_bytes",     // 7
    "dur",          // 8
    "packetins",    // 9
];

/// Total number of features
/// IMPORTANT: Must match both INPUT_FIELDS.len() and SCALER_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 10;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the scaler column layout
/// Used to detect layout mismatches against loaded artifacts
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[LAYOUT_VERSION]);

    for name in SCALER_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a record or artifact does not match the current layout
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that incoming data matches the current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != LAYOUT_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: LAYOUT_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FIELD LOOKUP
// ============================================================================

/// Get sidebar field spec by name
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    INPUT_FIELDS.iter().find(|f| f.name == name)
}

/// Get a field's index in the sidebar entry order
pub fn input_index(name: &str) -> Option<usize> {
    INPUT_FIELDS.iter().position(|f| f.name == name)
}

/// Get a field's column index in the scaler order
pub fn scaler_index(name: &str) -> Option<usize> {
    SCALER_LAYOUT.iter().position(|&n| n == name)
}

/// Get scaler column name by index
pub fn scaler_column(index: usize) -> Option<&'static str> {
    SCALER_LAYOUT.get(index).copied()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for the status command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub scaler_columns: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: LAYOUT_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            scaler_columns: SCALER_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// TESTS
// ============================================================================
