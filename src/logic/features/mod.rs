//! Features Module - Field schema, records and presets
//!
//! Everything that defines what the ten flow features are lives here;
//! the model modules only ever see scaler-ordered columns.

pub mod layout;
pub mod record;
pub mod presets;

// Re-export common types
pub use layout::{FEATURE_COUNT, SCALER_LAYOUT, LayoutInfo, LayoutMismatchError};
pub use record::{FlowRecord, FlowRecordBuilder};
pub use presets::{Preset, PresetInfo, PRESETS};
