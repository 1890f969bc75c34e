//! Phase 1: Line Lexer
//!
//! The lexer turns one source line into tokens. It emits:
//! - `Indent`: the leading spaces, if any
//! - `Space`, `Word`, `Dash`, `Colon`, `DoubleQuote`, `SingleQuote`: the
//!   rest of the line, left to right, with no gaps
//! - `Newline`: exactly once, last
//!
//! No state carries over between lines. Whether a `-` or `:` is structural
//! is decided by the parser, not here.

use crate::token::{Token, TokenKind};
use tracing::trace;

/// Iterator over the tokens of a single line.
#[derive(Clone)]
pub struct LineLexer<'src> {
    /// The remaining text of the line.
    remaining: &'src str,
    /// Whether the indent has been looked at yet.
    started: bool,
    /// Whether the newline marker has been produced.
    done: bool,
}

impl<'src> LineLexer<'src> {
    /// Create a lexer for one line. The line must not contain `\n`.
    pub fn new(line: &'src str) -> Self {
        Self {
            remaining: line,
            started: false,
            done: false,
        }
    }

    fn take(&mut self, len: usize, kind: TokenKind) -> Token {
        let (text, rest) = self.remaining.split_at(len);
        self.remaining = rest;
        let token = Token::new(kind, text);
        trace!(kind = %token.kind, text = %token.text, "token");
        token
    }

    /// Byte length of the longest prefix whose chars satisfy `pred`.
    fn run_len(&self, pred: impl Fn(char) -> bool) -> usize {
        self.remaining
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or(self.remaining.len())
    }

    fn next_token(&mut self) -> Token {
        let Some(c) = self.remaining.chars().next() else {
            self.done = true;
            return Token::newline();
        };

        if is_space(c) {
            let len = self.run_len(is_space);
            return self.take(len, TokenKind::Space);
        }

        if let Some(kind) = symbol_kind(c) {
            return self.take(c.len_utf8(), kind);
        }

        let len = self.run_len(|c| !is_space(c) && symbol_kind(c).is_none());
        self.take(len, TokenKind::Word)
    }
}

impl Iterator for LineLexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            let indent = count_indent(self.remaining);
            if indent > 0 {
                return Some(self.take(indent, TokenKind::Indent));
            }
        }

        Some(self.next_token())
    }
}

/// Tokenize one line into a vector.
pub fn lex_line(line: &str) -> Vec<Token> {
    LineLexer::new(line).collect()
}

/// Tokenize a whole document, one `Newline` per line.
pub fn lex(source: &str) -> Vec<Token> {
    source.lines().flat_map(LineLexer::new).collect()
}

/// Count the number of leading spaces in a line.
fn count_indent(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn symbol_kind(c: char) -> Option<TokenKind> {
    match c {
        '-' => Some(TokenKind::Dash),
        ':' => Some(TokenKind::Colon),
        '"' => Some(TokenKind::DoubleQuote),
        '\'' => Some(TokenKind::SingleQuote),
        _ => None,
    }
}
