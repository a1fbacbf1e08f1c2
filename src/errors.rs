use std::fmt::Display;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading structured input.
///
/// Every kind carries enough context (line, token position, offending text or path)
/// to locate the problem in the input without re-running under a debugger.
#[derive(Debug, Error)]
pub enum ReadError {
    /// A read was attempted past the last available line.
    #[error("End of input reached after line {line}, cannot read more lines")]
    EndOfInput {
        /// Number of lines fetched before the input ran out.
        line: usize,
    },
    /// A whole-line read was attempted while the current line still has unread tokens.
    #[error("The end of line {line} was not consumed, remaining tokens: '{remaining}'")]
    IncompleteLineRead {
        /// Line whose tokens were left unread.
        line: usize,
        /// The unread tokens, joined by single spaces.
        remaining: String,
    },
    /// The reader was closed while unread lines remain.
    #[error("The end of the input was not consumed, {lines_remaining} lines remaining")]
    IncompleteInputRead {
        /// Number of lines still available in the source.
        lines_remaining: usize,
    },
    /// A token could not be coerced to the requested type.
    #[error("Line {line}, token {token}: expected {expected}, got '{text}'")]
    MalformedToken {
        /// 1-based line of the token.
        line: usize,
        /// 1-based position of the token on its line.
        token: usize,
        /// Human readable name of the requested type.
        expected: &'static str,
        /// The raw token text.
        text: String,
    },
    /// A nonsensical argument was passed to the reader.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The underlying stream failed.
    #[error("IO error after line {line}: {source}")]
    Io {
        /// Number of lines fetched when the failure occurred.
        line: usize,
        /// The low-level cause.
        #[source]
        source: io::Error,
    },
    /// Opening or reading a file-backed input failed.
    #[error("Failed to read input file '{}': {}", .path.display(), .source)]
    FileAccess {
        /// Path of the input file.
        path: PathBuf,
        /// What went wrong while the file was open.
        #[source]
        source: Box<ReadError>,
    },
    /// Raised by parsing routines and by the serde deserializer.
    #[error("{0}")]
    Custom(String),
}

impl ReadError {
    /// Builds a [`ReadError::Custom`] from any displayable message.
    pub fn custom<T: Display>(msg: T) -> Self {
        ReadError::Custom(msg.to_string())
    }
}

/// A specialized `Result` type for read operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// The output file could not be written.
#[derive(Debug, Error)]
#[error("Failed to write output file '{}': {}", .path.display(), .source)]
pub struct WriteError {
    /// Destination that failed.
    pub path: PathBuf,
    /// The low-level cause.
    #[source]
    pub source: io::Error,
}

/// Errors of the "read input, solve, write output" pipeline.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Reading or parsing the input failed.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// Writing the output failed.
    #[error(transparent)]
    Write(#[from] WriteError),
}
