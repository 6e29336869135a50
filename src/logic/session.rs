//! Session Store - Per-session form state
//!
//! Each UI session owns one `FormState`: the live record plus the name of
//! the last preset applied. Transitions are a pure function over (state,
//! event), so the form logic is testable without a webview; the store is
//! just a map guarded by a lock. Sessions never share state and the loaded
//! artifacts are never mutated, so no further synchronization is needed.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::features::presets;
use crate::logic::features::record::FlowRecord;

// ============================================================================
// STATE
// ============================================================================

static SESSIONS: Lazy<RwLock<HashMap<String, FormState>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Everything one session's form remembers between renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub record: FlowRecord,
    pub last_preset: Option<String>,
}

impl FormState {
    /// Fresh state: all-zero record, no preset applied
    pub fn new() -> Self {
        Self {
            record: FlowRecord::new(),
            last_preset: None,
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// One user interaction with the form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    /// Preset button pressed: overwrites all ten fields at once
    ApplyPreset { name: String },
    /// One field edited; values below 0 are floored by the record
    SetField { name: String, value: f64 },
    /// Back to the all-zero default state
    Reset,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub struct SessionError(pub String);

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionError: {}", self.0)
    }
}

impl std::error::Error for SessionError {}

// ============================================================================
// PURE TRANSITION
// ============================================================================

/// Apply one event to a state, producing the next state.
///
/// Pure: no session map access, no artifact access. Unknown preset or field
/// names are errors and leave no partial mutation behind.
pub fn apply_event(state: &FormState, event: &FormEvent) -> Result<FormState, SessionError> {
    match event {
        FormEvent::ApplyPreset { name } => {
            let preset = presets::preset(name)
                .ok_or_else(|| SessionError(format!("Unknown preset: {}", name)))?;
            Ok(FormState {
                record: preset.to_record(),
                last_preset: Some(preset.name.to_string()),
            })
        }
        FormEvent::SetField { name, value } => {
            let mut next = state.clone();
            if !next.record.set(name, *value) {
                return Err(SessionError(format!("Unknown field: {}", name)));
            }
            Ok(next)
        }
        FormEvent::Reset => Ok(FormState::new()),
    }
}

// ============================================================================
// SESSION MAP
// ============================================================================

/// Create a new session with default state, returning its id
pub fn create() -> String {
    let id = uuid::Uuid::new_v4().to_string();
    SESSIONS.write().insert(id.clone(), FormState::new());
    log::debug!("Session created: {}", id);
    id
}

/// Current state for a session; unknown ids get a fresh default state.
/// Lazily materializing keeps reconnecting webviews working after a
/// backend restart.
pub fn get(session_id: &str) -> FormState {
    SESSIONS
        .read()
        .get(session_id)
        .cloned()
        .unwrap_or_default()
}

/// Apply an event to a session and store the next state
pub fn dispatch(session_id: &str, event: &FormEvent) -> Result<FormState, SessionError> {
    let current = get(session_id);
    let next = apply_event(&current, event)?;
    SESSIONS.write().insert(session_id.to_string(), next.clone());
    Ok(next)
}

/// Drop a session's state
pub fn remove(session_id: &str) {
    SESSIONS.write().remove(session_id);
}

// ============================================================================
// TESTS
// ============================================================================
