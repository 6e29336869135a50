//! DDoS Attack Classifier - Main Entry Point

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod logic;
pub mod constants;

use api::commands;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    // The scaler, encoder and classifier artifacts are mandatory. No retry,
    // no fallback: without them the process cannot serve a single render.
    if let Err(e) = logic::model::artifacts::init() {
        log::error!("Artifact load failed: {}", e);
        log::error!(
            "Expected {}, {} and {} under '{}' (override with {})",
            constants::SCALER_FILE,
            constants::ENCODERS_FILE,
            constants::MODEL_FILE,
            logic::model::artifacts::resolve_artifact_dir().display(),
            constants::ARTIFACT_DIR_ENV
        );
        std::process::exit(1);
    }
    log::info!("Artifacts loaded, classifier ready");

    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            // Session Commands
            commands::create_session,
            commands::get_form,
            commands::set_field,
            commands::apply_preset,
            commands::reset_form,
            commands::close_session,

            // Preset Commands
            commands::list_presets,

            // Classification Commands
            commands::classify,

            // Status Commands
            commands::get_status,
            commands::verify_artifact_checksum,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
