//! Error types for conversion.

use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => format!(" at {}:{}", line + 1, col + 1),
        }
    }
}

/// Recoverable condition found while parsing a line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A non-blank line that is not a value, an item, or a key in its place.
    #[error("Unrecognized line structure ({0}){1}")]
    UnrecognizedLine(&'static str, String),
}

impl ParseError {
    pub(crate) fn unrecognized(reason: &'static str) -> Self {
        ParseError::UnrecognizedLine(reason, String::new())
    }

    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, line: usize, col: usize) -> Self {
        let suffix = ctx.loc_suffix(line, col);
        match self {
            ParseError::UnrecognizedLine(reason, _) => ParseError::UnrecognizedLine(reason, suffix),
        }
    }
}

/// Event that does not fit the renderer's open containers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Event out of place: a key outside a mapping, a value with no key or
    /// element before it, or an end without its start.
    #[error("Unbalanced event {0}")]
    Unbalanced(&'static str),

    /// Stream closed with containers still open.
    #[error("Event stream ended with {0} open container(s)")]
    Unclosed(usize),
}

/// Top-level error for the conversion pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A pipeline stage thread panicked.
    #[error("Pipeline stage {0} failed")]
    StageFailed(&'static str),
}
