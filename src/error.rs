use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DotfigError {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("'{key}' holds a nested map, refusing to overwrite it in strict mode")]
    StrictOverwrite { key: String },

    #[error("Cannot descend into '{segment}' while setting '{key}': it holds a plain value")]
    PathConflict { key: String, segment: String },

    #[error("Failed to parse {} (line {line}): {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Cannot resolve placeholder '${{{reference}}}'")]
    Interpolation { reference: String },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
