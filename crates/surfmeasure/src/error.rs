use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading, merging or importing.
///
/// Selecting the wrong files is not an error: see
/// [`SelectionError`](crate::import::SelectionError), which cancels an import
/// instead of failing it.
#[derive(Error, Debug)]
pub enum AscError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}:{line}: expected {expected}, found `{token}`")]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
        expected: &'static str,
    },

    #[error("{path}:{line}: expected at least {expected} fields, found {found}")]
    MissingField {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{path}:{line}: blank line")]
    BlankLine { path: PathBuf, line: usize },

    #[error("vertex {vertex} has {found} measurements but the first vertex has {expected}")]
    RaggedMeasures {
        vertex: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("host rejected the mesh: {0:#}")]
    Host(#[from] anyhow::Error),
}

pub type AscResult<T> = Result<T, AscError>;

impl AscError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AscError::Io {
            path: path.into(),
            source,
        }
    }
}
