//! Error types for the IRC protocol engine.
//!
//! This module defines error types for protocol-level failures, message
//! parsing failures, and outbound formatting misuse.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error on a received line.
    #[error("decode error: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// Line exceeded the maximum allowed length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Failed to parse an IRC message.
    #[error("invalid message: {string:?}")]
    InvalidMessage {
        /// The offending input line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },

    /// An outbound command could not be formatted.
    ///
    /// This indicates a bug in the code constructing the command, not a
    /// transient condition; it is never retried.
    #[error(transparent)]
    InvalidFormat(#[from] FormatError),
}

/// Errors encountered when parsing IRC messages and protocol values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// The line was empty.
    #[error("empty message")]
    EmptyMessage,

    /// A CR or LF appeared inside the line body.
    #[error("embedded CR or LF at position {position}")]
    EmbeddedLineEnding {
        /// Byte position of the offending character.
        position: usize,
    },

    /// A grammar rule failed partway through the line.
    #[error("parsing failed at position {position}: expected {expected}")]
    Failed {
        /// Byte position where parsing failed.
        position: usize,
        /// Description of what was being parsed.
        expected: &'static str,
    },

    /// An ISUPPORT token could not be parsed.
    #[error("invalid ISUPPORT token: {0:?}")]
    InvalidIsupport(String),

    /// A PREFIX value did not match the `(letters)symbols` syntax.
    #[error("invalid PREFIX value: {0:?}")]
    InvalidPrefixSpec(String),

    /// The two PREFIX segments were of different lengths.
    #[error("PREFIX segments differ in length: {modes} modes vs {symbols} symbols")]
    PrefixLengthMismatch {
        /// Number of mode letters inside the parentheses.
        modes: usize,
        /// Number of privilege symbols after the parentheses.
        symbols: usize,
    },

    /// A MODE string could not be expanded.
    #[error("invalid mode string: {string:?}")]
    InvalidModeString {
        /// The raw mode string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: ModeParseError,
    },
}

/// Errors encountered when expanding MODE strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModeParseError {
    /// The string did not begin with `+` or `-`.
    #[error("missing mode modifier")]
    MissingModeModifier,
}

/// Errors raised when formatting an outbound command.
///
/// Every variant is a caller programming error: the arguments given to the
/// formatter could never be reproduced by the wire grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    /// The command name was empty.
    #[error("empty command")]
    EmptyCommand,

    /// The command name contained a space, CR, or LF.
    #[error("illegal character in command: {0:?}")]
    IllegalCommandChar(char),

    /// A non-trailing argument contained a space.
    ///
    /// Such an argument would be split apart when re-parsed as a middle
    /// parameter. Only the final argument may contain spaces.
    #[error("space in non-trailing argument {index}: {argument:?}")]
    SpaceInMiddleArgument {
        /// Zero-based argument index.
        index: usize,
        /// The offending argument.
        argument: String,
    },

    /// An argument contained a CR or LF.
    #[error("CR or LF in argument {index}")]
    LineEndingInArgument {
        /// Zero-based argument index.
        index: usize,
    },
}
