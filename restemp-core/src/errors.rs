use thiserror::Error;

/// Error type for a failed run phase.
///
/// Errors raised by a model or plotter are carried through the orchestrator unchanged,
/// so the variant identifies the phase that produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("{0}")]
    Error(String),
    #[error("Invalid run configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to access {path}: {message}")]
    Io { path: String, message: String },
    #[error("Unknown temperature units '{0}'. Expected one of: degF, degC")]
    UnknownUnits(String),
    #[error("Model initialization failed: {0}")]
    Initialization(String),
    #[error("Model step failed: {0}")]
    Step(String),
    #[error("Model finalize failed: {0}")]
    Finalize(String),
    #[error("Result '{key}' not found. Available results: {available:?}")]
    MissingResult { key: String, available: Vec<String> },
    #[error("Malformed result table: {0}")]
    MalformedTable(String),
    #[error("Plot '{plot}' failed: {message}")]
    Plot { plot: String, message: String },
    #[error("Python error: {0}")]
    Python(String),
    #[error("Failed to export results: {0}")]
    Export(String),
}

impl RunError {
    pub(crate) fn io(path: impl std::fmt::Display, err: std::io::Error) -> Self {
        RunError::Io {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

/// Convenience type for `Result<T, RunError>`.
pub type RunResult<T> = Result<T, RunError>;
