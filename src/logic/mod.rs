//! Logic Module - Classifier core
//!
//! - `features/` - field schema, records, presets
//! - `model/` - fitted artifacts, scaling, ONNX inference, verdicts
//! - `session` - per-session form state with pure transitions
//! - `pipeline` - assemble → scale → classify

pub mod features;
pub mod model;
pub mod pipeline;
pub mod session;
