/*!
 * Error types for the subburn library.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while decoding a subtitle script
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A timecode field could not be decoded
    #[error("malformed timecode: {text:?}")]
    MalformedTimecode {
        /// The text that failed to decode
        text: String,
    },

    /// The script structure was violated
    #[error("malformed script at line {line}: {reason}")]
    MalformedScript {
        /// One-based line number where the violation was detected
        line: usize,
        /// What went wrong
        reason: String,
    },

    /// A closing tag was found with no matching open tag
    #[error("unbalanced closing tag </{tag}>")]
    UnbalancedTag {
        /// Name of the offending tag
        tag: String,
    },
}

/// Errors that can occur during media format negotiation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    /// The proposed format was rejected and no fallback succeeded
    #[error("format not accepted: {proposed}")]
    FormatNotAccepted {
        /// Display form of the format that was proposed to the stage
        proposed: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from script parsing
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from format negotiation
    #[error("Negotiation error: {0}")]
    Negotiation(#[from] NegotiationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
