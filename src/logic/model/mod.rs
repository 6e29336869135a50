//! Model Module - Fitted artifacts and inference
//!
//! - `artifacts` - startup loading of the scaler/encoder/classifier trio
//! - `scaler` - fitted standard-scaler transform
//! - `encoders` - fitted label encoders (vestigial)
//! - `inference` - ONNX Runtime session and label extraction
//! - `verdict` - binary outcome and banner mapping

pub mod artifacts;
pub mod encoders;
pub mod inference;
pub mod scaler;
pub mod verdict;

pub use verdict::{BannerTone, Verdict};
