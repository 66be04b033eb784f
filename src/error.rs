//! Error taxonomy for the compression pipeline.
//!
//! The engine is total on well-formed inputs: scoring and allocation cannot
//! fail, and a renderer that cannot fit a node folds it instead of erroring.
//! What remains is parse failures, invalid caller options, and I/O from the
//! surrounding CLI.

use thiserror::Error;

/// Failures surfaced by parsing, option validation, or file handling.
///
/// Budget exhaustion is deliberately absent: a budget too small for even an
/// overview degrades to a single truncated line rather than an error.
#[derive(Debug, Error)]
pub enum Error {
    /// A format failed to produce a valid tree and the text fallback also failed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Caller-supplied option rejected before any output is produced.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// File or stream access failed. Raised only outside the engine proper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = Error::InvalidOption("temperature must be > 0".to_string());
        assert!(err.to_string().contains("temperature"));

        let err = Error::Parse("bad heading".to_string());
        assert!(err.to_string().starts_with("parse error"));
    }
}
