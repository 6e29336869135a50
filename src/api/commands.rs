//! Tauri Commands - API for the classifier frontend
//!
//! The webview re-renders from these views on every interaction; all state
//! lives in `logic::session`, all inference behind `logic::pipeline`.

use serde::{Deserialize, Serialize};

use crate::logic::features::layout::{self, FieldKind, LayoutInfo};
use crate::logic::features::presets::{self, PresetInfo};
use crate::logic::model::verdict::BannerTone;
use crate::logic::model::{artifacts, inference, Verdict};
use crate::logic::session::{self, FormEvent};
use crate::logic::pipeline;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One bound sidebar input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub min: f64,
    pub step: f64,
    pub value: f64,
}

/// Everything the form needs to render one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormView {
    pub session_id: String,
    pub fields: Vec<FieldView>,
    pub last_preset: Option<String>,
}

/// One row of the main-panel input table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRow {
    pub name: String,
    pub label: String,
    pub value: f64,
}

/// Classification result for the main panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub verdict: Verdict,
    pub label: i64,
    pub banner: String,
    pub tone: BannerTone,
    pub rows: Vec<InputRow>,
    pub inference_time_us: u64,
}

/// Artifact + engine status for the UI footer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub app_version: String,
    pub engine: inference::EngineStatus,
    pub artifacts: Option<artifacts::ArtifactManifest>,
    pub layout: LayoutInfo,
}

// ============================================================================
// VIEW PROJECTION
// ============================================================================

/// Pure projection: render(state) with no side effects
fn render(session_id: &str, state: &session::FormState) -> FormView {
    let fields = layout::INPUT_FIELDS
        .iter()
        .map(|spec| FieldView {
            name: spec.name.to_string(),
            label: spec.label.to_string(),
            kind: spec.kind,
            min: 0.0,
            step: spec.step,
            value: state.record.get(spec.name).unwrap_or(0.0),
        })
        .collect();

    FormView {
        session_id: session_id.to_string(),
        fields,
        last_preset: state.last_preset.clone(),
    }
}

fn input_rows(state: &session::FormState) -> Vec<InputRow> {
    state
        .record
        .rows()
        .into_iter()
        .map(|(name, label, value)| InputRow {
            name: name.to_string(),
            label: label.to_string(),
            value,
        })
        .collect()
}

// ============================================================================
// SESSION COMMANDS
// ============================================================================

/// Create a session and return its initial form view
#[tauri::command]
pub async fn create_session() -> Result<FormView, String> {
    let id = session::create();
    Ok(render(&id, &session::get(&id)))
}

/// Current form view for a session
#[tauri::command]
pub async fn get_form(session_id: String) -> Result<FormView, String> {
    Ok(render(&session_id, &session::get(&session_id)))
}

/// Edit one field
#[tauri::command]
pub async fn set_field(session_id: String, name: String, value: f64) -> Result<FormView, String> {
    let state = session::dispatch(&session_id, &FormEvent::SetField { name, value })
        .map_err(|e| e.to_string())?;
    Ok(render(&session_id, &state))
}

/// Apply a preset: overwrites all ten fields at once
#[tauri::command]
pub async fn apply_preset(session_id: String, name: String) -> Result<FormView, String> {
    let state = session::dispatch(&session_id, &FormEvent::ApplyPreset { name })
        .map_err(|e| e.to_string())?;
    Ok(render(&session_id, &state))
}

/// Back to the all-zero default
#[tauri::command]
pub async fn reset_form(session_id: String) -> Result<FormView, String> {
    let state = session::dispatch(&session_id, &FormEvent::Reset).map_err(|e| e.to_string())?;
    Ok(render(&session_id, &state))
}

/// Drop a session's state
#[tauri::command]
pub async fn close_session(session_id: String) -> Result<(), String> {
    session::remove(&session_id);
    Ok(())
}

// ============================================================================
// PRESET COMMANDS
// ============================================================================

/// Preset button row
#[tauri::command]
pub async fn list_presets() -> Result<Vec<PresetInfo>, String> {
    Ok(presets::PRESETS.iter().map(PresetInfo::from).collect())
}

// ============================================================================
// CLASSIFICATION COMMANDS
// ============================================================================

/// Classify the session's current record.
///
/// Scaling/inference errors abort this classification only; the session
/// state and loaded artifacts are untouched.
#[tauri::command]
pub async fn classify(session_id: String) -> Result<ClassifyResponse, String> {
    let state = session::get(&session_id);
    let record = state.record.clone();

    let result = tokio::task::spawn_blocking(move || pipeline::classify_with_artifacts(&record))
        .await
        .map_err(|e| format!("Task failed: {}", e))?
        .map_err(|e| e.to_string())?;

    log::info!(
        "Classified session {}: label={} verdict={:?} ({}us)",
        session_id,
        result.label,
        result.verdict,
        result.inference_time_us
    );

    Ok(ClassifyResponse {
        verdict: result.verdict,
        label: result.label,
        banner: result.verdict.banner().to_string(),
        tone: result.verdict.tone(),
        rows: input_rows(&state),
        inference_time_us: result.inference_time_us,
    })
}

// ============================================================================
// STATUS COMMANDS
// ============================================================================

/// Engine + artifact status
#[tauri::command]
pub async fn get_status() -> Result<StatusResponse, String> {
    Ok(StatusResponse {
        app_version: crate::constants::APP_VERSION.to_string(),
        engine: inference::get_status(),
        artifacts: artifacts::get_manifest(),
        layout: LayoutInfo::current(),
    })
}

/// Compare a loaded artifact's digest against an expected SHA-256 hex digest
#[tauri::command]
pub async fn verify_artifact_checksum(artifact: String, expected: String) -> Result<bool, String> {
    artifacts::verify_checksum(&artifact, &expected).map_err(|e| e.to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::FEATURE_COUNT;
    use crate::logic::session::FormState;

    #[test]
    fn test_render_projects_all_fields() {
        let view = render("s", &FormState::new());
        assert_eq!(view.fields.len(), FEATURE_COUNT);
        assert_eq!(view.session_id, "s");
        assert!(view.fields.iter().all(|f| f.min == 0.0));
        assert!(view.last_preset.is_none());
    }

    #[test]
    fn test_render_reflects_state() {
        let state = crate::logic::session::apply_event(
            &FormState::new(),
            &FormEvent::ApplyPreset { name: "Example 4".to_string() },
        )
        .unwrap();

        let view = render("s", &state);
        let dur = view.fields.iter().find(|f| f.name == "dur").unwrap();
        assert_eq!(dur.value, 500_000.0);
        assert_eq!(view.last_preset.as_deref(), Some("Example 4"));
    }

    #[test]
    fn test_input_rows_follow_entry_order() {
        let rows = input_rows(&FormState::new());
        assert_eq!(rows.len(), FEATURE_COUNT);
        assert_eq!(rows[0].name, "bytecount");
        assert_eq!(rows[0].label, "Byte Count");
        assert_eq!(rows[9].name, "tx_bytes");
    }
}
