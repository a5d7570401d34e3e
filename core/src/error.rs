//! Error types surfaced by the alignment core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Typed failures of configuration, input handling and alignment.
///
/// The core never recovers locally; errors propagate to the embedding,
/// which turns them into a diagnostic and an exit code.
#[derive(Debug, Error)]
pub enum AlignError {
    /// An enumerated option received a value outside its vocabulary.
    #[error("unknown {what}: {value}")]
    UnknownSelector { what: &'static str, value: String },

    /// A registered alignment category carries a non-positive probability.
    #[error(
        "category {source_len}-{target_len} has non-positive probability {probability}"
    )]
    InvalidCategory {
        source_len: usize,
        target_len: usize,
        probability: f64,
    },

    /// A numeric parameter is outside its meaningful range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A file could not be opened or read.
    #[error("can't read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input stream does not follow its declared format.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl AlignError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
