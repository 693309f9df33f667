use thiserror::Error;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to start the rendering host: {0}")]
    Host(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is neither valid TOML nor JSON: {reason}")]
    Parse { path: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum ViewportError {
    #[error("viewport size {width}x{height} is not a positive finite size")]
    Degenerate { width: f32, height: f32 },
}
