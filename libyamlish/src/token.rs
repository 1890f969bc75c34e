//! Token vocabulary shared by the lexer and the structural parser.

use std::fmt;

/// Token type in the lexer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Leading run of spaces.
    Indent,
    /// Run of characters that are neither whitespace nor a symbol.
    Word,
    /// Run of spaces and tabs after the indent.
    Space,
    /// `-`
    Dash,
    /// `:`
    Colon,
    /// `"`
    DoubleQuote,
    /// `'`
    SingleQuote,
    /// End of line. One per input line.
    Newline,
}

impl TokenKind {
    /// Upper-case name used in logs and event dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Indent => "INDENT",
            TokenKind::Word => "WORD",
            TokenKind::Space => "SPACE",
            TokenKind::Dash => "DASH",
            TokenKind::Colon => "COLON",
            TokenKind::DoubleQuote => "DOUBLE_QUOTE",
            TokenKind::SingleQuote => "SINGLE_QUOTE",
            TokenKind::Newline => "NEWLINE",
        }
    }

    /// Returns the literal for single-character kinds.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            TokenKind::Dash => Some("-"),
            TokenKind::Colon => Some(":"),
            TokenKind::DoubleQuote => Some("\""),
            TokenKind::SingleQuote => Some("'"),
            TokenKind::Newline => Some("\n"),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lexical unit from one input line.
///
/// `text` always holds the literal source text, so an indent of three
/// carries `"   "` and a newline carries `"\n"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }

    /// Build a single-character symbol token (or the newline marker).
    pub fn symbol(kind: TokenKind) -> Self {
        Self::new(kind, kind.symbol().unwrap_or_default())
    }

    pub fn indent(count: usize) -> Self {
        Self {
            kind: TokenKind::Indent,
            text: " ".repeat(count),
        }
    }

    pub fn word(text: &str) -> Self {
        Self::new(TokenKind::Word, text)
    }

    pub fn space(text: &str) -> Self {
        Self::new(TokenKind::Space, text)
    }

    pub fn newline() -> Self {
        Self::symbol(TokenKind::Newline)
    }

    /// Number of columns the token occupies.
    pub fn width(&self) -> usize {
        match self.kind {
            TokenKind::Newline => 0,
            _ => self.text.chars().count(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whitespace-only tokens carry no content of their own.
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, TokenKind::Indent | TokenKind::Space)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_text() {
        let t = Token::indent(3);
        assert_eq!(t.text, "   ");
        assert_eq!(t.width(), 3);
    }

    #[test]
    fn test_symbol_text() {
        assert_eq!(Token::symbol(TokenKind::Dash).text, "-");
        assert_eq!(Token::symbol(TokenKind::SingleQuote).text, "'");
        assert_eq!(Token::newline().width(), 0);
    }

    #[test]
    fn test_width_counts_chars() {
        assert_eq!(Token::word("héllo").width(), 5);
    }
}
