//! Error types for the kulgad client.

use std::io;
use thiserror::Error;

/// Result type alias for kulgad operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing a channel specification.
///
/// Parsing is fail-fast: the first offending piece aborts the whole
/// specification and nothing is partially accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The specification contained no channels at all.
    #[error("no channels given (use e.g. 1,2,3 or 7-12 or all)")]
    NoChannels,

    /// A comma-separated piece was empty.
    #[error("invalid token: empty entry at position {position} in '{spec}'")]
    EmptyToken {
        /// The full specification being parsed.
        spec: String,
        /// Zero-based index of the empty piece.
        position: usize,
    },

    /// A piece contained whitespace.
    #[error("invalid token '{token}': whitespace is not allowed")]
    Whitespace {
        /// The offending piece.
        token: String,
    },

    /// A single-value piece contained something other than decimal digits.
    #[error("invalid channel: {token}")]
    InvalidChannel {
        /// The offending piece.
        token: String,
    },

    /// A range piece had an empty or non-numeric side.
    #[error("invalid range: {token}")]
    InvalidRange {
        /// The offending piece.
        token: String,
    },

    /// A channel number exceeded the configured upper bound.
    #[error("channel out of range: {value} (valid channels are 0-{max})")]
    OutOfRange {
        /// The offending number as written.
        value: String,
        /// Highest accepted channel.
        max: u8,
    },
}

impl ParseError {
    pub(crate) fn invalid_channel(token: impl Into<String>) -> Self {
        Self::InvalidChannel {
            token: token.into(),
        }
    }

    pub(crate) fn invalid_range(token: impl Into<String>) -> Self {
        Self::InvalidRange {
            token: token.into(),
        }
    }

    pub(crate) fn out_of_range(value: impl Into<String>, max: u8) -> Self {
        Self::OutOfRange {
            value: value.into(),
            max,
        }
    }
}

/// Errors that can occur while driving a kulgad session.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or conflicting options.
    #[error("Usage error: {reason}")]
    Usage {
        /// Description of the problem.
        reason: String,
    },

    /// Malformed channel specification.
    #[error("Invalid channel specification: {0}")]
    Parse(#[from] ParseError),

    /// The connection to the device could not be established.
    #[error("Connection to {host}:{port} failed: {reason}")]
    Connection {
        /// Host that was dialled.
        host: String,
        /// Port that was dialled.
        port: u16,
        /// Underlying cause.
        reason: String,
    },

    /// A GET response did not contain a decodable `pins` array.
    #[error("Malformed response: {reason}")]
    MalformedResponse {
        /// Description of what was missing.
        reason: String,
    },

    /// I/O error while sending or receiving.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Creates a new `Usage` error.
    ///
    /// # Example
    ///
    /// ```
    /// use kulgad::Error;
    ///
    /// let err = Error::usage("missing value for set, use on or off");
    /// ```
    pub fn usage(reason: impl Into<String>) -> Self {
        Self::Usage {
            reason: reason.into(),
        }
    }

    /// Creates a new `Connection` error.
    pub fn connection(host: impl Into<String>, port: u16, reason: impl ToString) -> Self {
        Self::Connection {
            host: host.into(),
            port,
            reason: reason.to_string(),
        }
    }

    /// Creates a new `MalformedResponse` error.
    ///
    /// # Example
    ///
    /// ```
    /// use kulgad::Error;
    ///
    /// let err = Error::malformed_response("'pins' key not found");
    /// ```
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}
