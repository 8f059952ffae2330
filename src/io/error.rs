use super::Format;
use crate::model::kekulize::KekulizeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The destination sink rejected a write or flush. The session stays open
    /// but should be treated as unusable.
    #[error("I/O operation failed: {source}")]
    Stream {
        #[from]
        source: std::io::Error,
    },

    #[error("the SD writer has been closed and cannot accept further operations")]
    UseAfterClose,

    /// Kekulization was requested for a molecule whose aromatic system has no
    /// valid alternating bond pattern.
    #[error("molecule cannot be kekulized: {0}")]
    ChemicalState(#[from] KekulizeError),

    /// A value cannot be expressed in the line-oriented record grammar.
    #[error("cannot write {field}: {reason}")]
    Format { field: String, reason: &'static str },

    #[error("conformer {0} does not exist on this molecule")]
    ConformerNotFound(u32),

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("invalid writer configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn format(field: impl Into<String>, reason: &'static str) -> Self {
        Self::Format {
            field: field.into(),
            reason,
        }
    }
}
