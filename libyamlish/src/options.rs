//! Conversion options.

use crate::error::ParseContext;

/// When the parser closes nested structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedentMode {
    /// Close every structure deeper than a line's indentation before the
    /// line is classified. Sibling keys continue their mapping, missing
    /// values become `null`, and lines that do not fit are reported.
    #[default]
    Close,
    /// Close structures only at end of input, and open a new mapping at the
    /// colon of every key. Nothing is reported, so the event stream is the
    /// historical converter's; streams that are not valid JSON fail in the
    /// renderer instead.
    Defer,
}

/// Layout of rendered JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// No whitespace at all.
    #[default]
    Compact,
    /// One member per line, two spaces per level.
    Pretty,
}

/// What the pipeline writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Json,
    /// One event per line, for inspecting the parser.
    Events,
}

/// Options shared by the parser, renderer, and pipeline.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Used in error locations.
    pub filename: Option<String>,
    pub dedent: DedentMode,
    /// Stop at the first unrecognized line instead of skipping it.
    pub strict: bool,
    pub style: JsonStyle,
    pub output: Output,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn dedent(mut self, dedent: DedentMode) -> Self {
        self.dedent = dedent;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub(crate) fn context(&self) -> ParseContext {
        ParseContext::new(self.filename.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::new();
        assert_eq!(options.dedent, DedentMode::Close);
        assert_eq!(options.style, JsonStyle::Compact);
        assert_eq!(options.output, Output::Json);
        assert!(!options.strict);
        assert!(options.filename.is_none());
    }

    #[test]
    fn test_builder() {
        let options = Options::new()
            .filename("a.yaml")
            .dedent(DedentMode::Defer)
            .strict(true)
            .style(JsonStyle::Pretty);
        assert_eq!(options.filename.as_deref(), Some("a.yaml"));
        assert_eq!(options.dedent, DedentMode::Defer);
        assert!(options.strict);
        assert_eq!(options.context().filename.as_deref(), Some("a.yaml"));
    }
}
