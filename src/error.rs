use std::path::PathBuf;
use thiserror::Error;

/// Which side of the duration window a session fell out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Bound {
    #[strum(serialize = "<")]
    Below,
    #[strum(serialize = ">")]
    Above,
}

/// First quality-gate violation found in a capture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing '{field}' field")]
    MissingField { field: &'static str },

    #[error("insufficient points ({actual} < {required})")]
    InsufficientPoints { actual: usize, required: usize },

    #[error("total duration out of range ({actual}ms {direction} {bound}ms)")]
    DurationOutOfRange {
        actual: i64,
        bound: i64,
        direction: Bound,
    },

    #[error("point {index} is missing required fields (a, b, c)")]
    MalformedPoint { index: usize },
}

/// Why a single capture file did not make it into the corpus.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// Errors that stop a corpus operation as a whole.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("input directory does not exist: {}", path.display())]
    MissingInputDir { path: PathBuf },

    #[error("input path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("no JSON files found in {}", path.display())]
    NoInputFiles { path: PathBuf },

    #[error("line {line} is not a training record: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CorpusError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
