//! Streaming converter from an indentation-structured YAML subset to JSON.
//!
//! # Conversion Pipeline
//!
//! The converter operates in three phases, each able to run on its own
//! thread (see [`run`]):
//!
//! 1. **Lexer**: Splits each source line into tokens: indent, words,
//!    spaces, and the symbols `-`, `:`, `"`, `'`. No state carries between
//!    lines.
//!
//! 2. **Structural Parser**: Groups tokens by line and decides, from column
//!    positions alone, whether each line holds a scalar, an array item, or
//!    a mapping key. It emits a flat stream of [`Event`]s.
//!
//! 3. **Renderer**: Turns events into JSON text, tracking nesting from the
//!    pairing of start and end events.
//!
//! Quoted scalars, block scalars, anchors, and tags are not interpreted:
//! quote characters are kept as part of plain text.

mod error;
mod event;
mod json;
mod lexer;
mod options;
mod parser;
mod pipeline;
mod token;

pub use error::{Error, ParseContext, ParseError, RenderError, Result};
pub use event::{Event, Scalar, ScalarKind};
pub use json::{render_events, JsonRenderer};
pub use lexer::{lex, lex_line, LineLexer};
pub use options::{DedentMode, JsonStyle, Options, Output};
pub use parser::{parse_tokens, Breadcrumb, Nesting, Parser};
pub use pipeline::{run, Report};
pub use token::{Token, TokenKind};

/// Events for a document, with the lines that were skipped.
#[derive(Debug, Default)]
pub struct Parsed {
    pub events: Vec<Event>,
    pub diagnostics: Vec<ParseError>,
}

/// Parse a document into events without spawning threads.
///
/// In strict mode the first unrecognized line is an error; otherwise it is
/// skipped and reported in [`Parsed::diagnostics`].
pub fn parse(input: &str, options: &Options) -> Result<Parsed> {
    let (events, mut diagnostics) = parse_tokens(lex(input), options);
    if options.strict && !diagnostics.is_empty() {
        return Err(diagnostics.remove(0).into());
    }
    Ok(Parsed {
        events,
        diagnostics,
    })
}

/// Convert a document to compact JSON.
///
/// # Example
///
/// ```
/// let json = libyamlish::convert("name: demo\ntags:\n  - a\n  - b").unwrap();
/// assert_eq!(json, r#"{"name":"demo","tags":["a","b"]}"#);
/// ```
pub fn convert(input: &str) -> Result<String> {
    convert_with_options(input, &Options::new()).map(|(output, _)| output)
}

/// Convert a document through the threaded pipeline.
pub fn convert_with_options(input: &str, options: &Options) -> Result<(String, Report)> {
    let mut out = Vec::new();
    let report = run(input.as_bytes(), &mut out, options)?;
    Ok((String::from_utf8_lossy(&out).into_owned(), report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient() {
        let parsed = parse("- a\nb", &Options::new()).unwrap();
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.events.len(), 4);
    }

    #[test]
    fn test_parse_strict() {
        let err = parse("- a\nb", &Options::new().strict(true)).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_convert_empty() {
        assert_eq!(convert("").unwrap(), "");
    }

    #[test]
    fn test_convert_pretty() {
        let options = Options::new().style(JsonStyle::Pretty);
        let (json, _) = convert_with_options("a: 1", &options).unwrap();
        assert_eq!(json, "{\n  \"a\": 1\n}");
    }
}
