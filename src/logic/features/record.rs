//! Flow Record - Core data structure for classifier input
//!
//! **Versioned record with layout validation**
//!
//! Values are keyed by the sidebar entry order but always leave this module
//! in the scaler column order via `assemble()`.

use serde::{Deserialize, Serialize};
use super::layout::{
    FEATURE_COUNT, LAYOUT_VERSION, INPUT_FIELDS,
    layout_hash, validate_layout, input_index, LayoutMismatchError,
};

// ============================================================================
// VERSIONED FLOW RECORD
// ============================================================================

/// One flow measurement: ten non-negative numeric fields.
///
/// `values` is stored in INPUT_FIELDS order. Use `assemble()` to get the
/// scaler-ordered columns; never index `values` with a scaler index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the scaler layout (for mismatch detection)
    pub layout_hash: u32,
    /// Field values in INPUT_FIELDS order
    pub values: [f64; FEATURE_COUNT],
}

impl FlowRecord {
    /// Create a new all-zero record with the current layout version
    pub fn new() -> Self {
        Self {
            version: LAYOUT_VERSION,
            layout_hash: layout_hash(),
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// Create from raw values in INPUT_FIELDS order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: LAYOUT_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get field value by name
    pub fn get(&self, name: &str) -> Option<f64> {
        input_index(name).map(|i| self.values[i])
    }

    /// Set field by name, flooring at the binder's minimum bound of 0.
    /// Returns false for unknown field names.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        if let Some(index) = input_index(name) {
            self.values[index] = value.max(0.0);
            true
        } else {
            false
        }
    }

    /// Reorder the values into the fixed scaler column order.
    ///
    /// This is the only path from bound inputs to the scaler; the output
    /// order must match what the scaler was fitted on exactly.
    pub fn assemble(&self) -> [f64; FEATURE_COUNT] {
        let mut columns = [0.0; FEATURE_COUNT];
        for (i, name) in super::layout::SCALER_LAYOUT.iter().enumerate() {
            // Both orders are compile-time constants over the same field set
            columns[i] = self.get(name).unwrap_or(0.0);
        }
        columns
    }

    /// Validate that this record is compatible with the current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// (name, label, value) rows in sidebar entry order, for display
    pub fn rows(&self) -> Vec<(&'static str, &'static str, f64)> {
        INPUT_FIELDS
            .iter()
            .zip(self.values.iter())
            .map(|(spec, value)| (spec.name, spec.label, *value))
            .collect()
    }

    /// JSON projection for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "layout_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": INPUT_FIELDS.iter()
                .zip(self.values.iter())
                .map(|(spec, value)| (spec.name.to_string(), *value))
                .collect::<std::collections::HashMap<_, _>>(),
        })
    }
}

impl Default for FlowRecord {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating FlowRecord with named setters
pub struct FlowRecordBuilder {
    record: FlowRecord,
}

impl FlowRecordBuilder {
    pub fn new() -> Self {
        Self { record: FlowRecord::new() }
    }

    pub fn bytecount(mut self, value: f64) -> Self {
        self.record.set("bytecount", value);
        self
    }

    pub fn pktcount(mut self, value: f64) -> Self {
        self.record.set("pktcount", value);
        self
    }

    pub fn dur(mut self, value: f64) -> Self {
        self.record.set("dur", value);
        self
    }

    pub fn tot_dur(mut self, value: f64) -> Self {
        self.record.set("tot_dur", value);
        self
    }

    pub fn packetins(mut self, value: f64) -> Self {
        self.record.set("packetins", value);
        self
    }

    pub fn pktperflow(mut self, value: f64) -> Self {
        self.record.set("pktperflow", value);
        self
    }

    pub fn byteperflow(mut self, value: f64) -> Self {
        self.record.set("byteperflow", value);
        self
    }

    pub fn pktrate(mut self, value: f64) -> Self {
        self.record.set("pktrate", value);
        self
    }

    pub fn dt(mut self, value: f64) -> Self {
        self.record.set("dt", value);
        self
    }

    pub fn tx_bytes(mut self, value: f64) -> Self {
        self.record.set("tx_bytes", value);
        self
    }

    /// Set field by name dynamically
    pub fn set(mut self, name: &str, value: f64) -> Self {
        self.record.set(name, value);
        self
    }

    pub fn build(self) -> FlowRecord {
        self.record
    }
}

impl Default for FlowRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::SCALER_LAYOUT;

    #[test]
    fn test_new_record_is_zeroed() {
        let record = FlowRecord::new();
        assert_eq!(record.version, LAYOUT_VERSION);
        assert_eq!(record.layout_hash, layout_hash());
        assert!(record.values.iter().all(|v| *v == 0.0));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_set_and_get_by_name() {
        let mut record = FlowRecord::new();
        assert!(record.set("bytecount", 42.0));
        assert_eq!(record.get("bytecount"), Some(42.0));

        assert!(!record.set("nonexistent", 1.0));
        assert_eq!(record.get("nonexistent"), None);
    }

    #[test]
    fn test_set_floors_negative_values() {
        let mut record = FlowRecord::new();
        assert!(record.set("pktrate", -5.0));
        assert_eq!(record.get("pktrate"), Some(0.0));
    }

    #[test]
    fn test_assemble_order_is_scaler_order() {
        let record = FlowRecordBuilder::new()
            .bytecount(1.0)
            .pktcount(2.0)
            .dur(3.0)
            .tot_dur(4.0)
            .packetins(5.0)
            .pktperflow(6.0)
            .byteperflow(7.0)
            .pktrate(8.0)
            .dt(9.0)
            .tx_bytes(10.0)
            .build();

        // [bytecount, pktcount, byteperflow, pktperflow, pktrate,
        //  dt, tot_dur, tx_bytes, dur, packetins]
        assert_eq!(
            record.assemble(),
            [1.0, 2.0, 7.0, 6.0, 8.0, 9.0, 4.0, 10.0, 3.0, 5.0]
        );
    }

    #[test]
    fn test_assemble_order_independent_of_construction_order() {
        let mut forward = FlowRecord::new();
        let mut reverse = FlowRecord::new();

        for (i, spec) in INPUT_FIELDS.iter().enumerate() {
            forward.set(spec.name, i as f64);
        }
        for (i, spec) in INPUT_FIELDS.iter().enumerate().rev() {
            reverse.set(spec.name, i as f64);
        }

        assert_eq!(forward.assemble(), reverse.assemble());
    }

    #[test]
    fn test_assemble_all_zero_record() {
        let columns = FlowRecord::new().assemble();
        assert_eq!(columns, [0.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_assemble_column_names_align() {
        let mut record = FlowRecord::new();
        record.set("dur", 313.0);
        let columns = record.assemble();

        let dur_col = SCALER_LAYOUT.iter().position(|&n| n == "dur").unwrap();
        assert_eq!(columns[dur_col], 313.0);
    }

    #[test]
    fn test_rows_follow_entry_order() {
        let record = FlowRecord::new();
        let rows = record.rows();
        assert_eq!(rows.len(), FEATURE_COUNT);
        assert_eq!(rows[0].0, "bytecount");
        assert_eq!(rows[0].1, "Byte Count");
        assert_eq!(rows[2].0, "dur");
    }

    #[test]
    fn test_to_log_entry() {
        let record = FlowRecordBuilder::new().pktcount(7.0).build();
        let log = record.to_log_entry();
        assert_eq!(log["layout_version"], LAYOUT_VERSION);
        assert_eq!(log["named_values"]["pktcount"], 7.0);
    }
}
