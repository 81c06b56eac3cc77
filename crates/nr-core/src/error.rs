use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Export kind that no exporter handles.
    #[error("Export non supporté : {kind} (attendu : ansi, png)")]
    UnsupportedExport {
        /// The requested export kind.
        kind: String,
    },
}
