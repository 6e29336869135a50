//! API Module - Tauri command surface

pub mod commands;
