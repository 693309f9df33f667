mod app;
mod error;
mod model;

use std::process::ExitCode;

use log::{error, info, warn};

use error::AppError;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let settings = match app::settings_path() {
        Some(path) => match app::load_settings(&path) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("{e}; using default settings");
                app::AppSettings::default()
            }
        },
        None => app::AppSettings::default(),
    };

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Blockdraw",
        native_options,
        Box::new(|cc| Ok(Box::new(app::DiagramApp::new(cc, settings)))),
    )
    .map_err(|e| AppError::Host(e.to_string()))
}
