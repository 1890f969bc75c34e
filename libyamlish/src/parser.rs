//! Phase 2: Structural Parser
//!
//! The parser consumes tokens one at a time, groups them into lines, and
//! turns each line into structure events against a stack of open contexts
//! ("breadcrumbs"). Each breadcrumb records the column where its content
//! begins, so indentation alone decides nesting.
//!
//! A line is, after its indent:
//! - a single word: a scalar value
//! - `- ` followed by anything: an array item whose content is the rest
//! - text followed by `:` and a space (or end of line): a mapping key whose
//!   value is the rest, or the next more indented line
//! - anything else: a plain scalar made of the whole remainder

use crate::error::{ParseContext, ParseError};
use crate::event::{Event, Scalar};
use crate::options::{DedentMode, Options};
use crate::token::{Token, TokenKind};
use tracing::debug;

/// Kind of an open structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Document,
    Array,
    Mapping,
}

/// One level of open structure and the column its content starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breadcrumb {
    pub nesting: Nesting,
    pub column: usize,
    /// A key or element (or, for the document, the start of input) is
    /// waiting for its value.
    pub pending: bool,
}

impl Breadcrumb {
    fn is(&self, nesting: Nesting, column: usize) -> bool {
        self.nesting == nesting && self.column == column
    }
}

/// Streaming token-to-event parser.
///
/// In [`DedentMode::Close`] every value must land in an open slot: the
/// document, or a key or element still waiting for one. Keys and elements
/// left without a value get `null`. [`DedentMode::Defer`] performs none of
/// these checks and reproduces the historical event stream, which the JSON
/// renderer may then reject.
pub struct Parser {
    /// Never empty: the bottom entry is the document.
    stack: Vec<Breadcrumb>,
    /// Tokens of the line being collected.
    line: Vec<Token>,
    /// Zero-based number of the line being collected.
    line_num: usize,
    dedent: DedentMode,
    ctx: ParseContext,
}

impl Parser {
    pub fn new(options: &Options) -> Self {
        Self {
            stack: vec![Breadcrumb {
                nesting: Nesting::Document,
                column: 0,
                pending: true,
            }],
            line: Vec::new(),
            line_num: 0,
            dedent: options.dedent,
            ctx: options.context(),
        }
    }

    /// Currently open structures, outermost first.
    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.stack
    }

    /// Feed one token. Events for a line are appended to `out` when its
    /// `Newline` arrives.
    ///
    /// On error the offending line is skipped; events already appended
    /// (closes caused by its indentation) stay valid and the parser can
    /// keep going.
    pub fn push(&mut self, token: Token, out: &mut Vec<Event>) -> Result<(), ParseError> {
        if !token.is(TokenKind::Newline) {
            self.line.push(token);
            return Ok(());
        }

        let tokens = std::mem::take(&mut self.line);
        let result = self.parse_line(&tokens, out);
        self.line_num += 1;
        result
    }

    /// Finish the stream: parse any unterminated last line, then close every
    /// open structure, innermost first.
    pub fn finish(&mut self, out: &mut Vec<Event>) -> Result<(), ParseError> {
        let tokens = std::mem::take(&mut self.line);
        let result = self.parse_line(&tokens, out);

        while self.stack.len() > 1 {
            self.close_top(out);
        }

        result
    }

    fn checks_slots(&self) -> bool {
        self.dedent == DedentMode::Close
    }

    fn top(&self) -> Breadcrumb {
        // The document entry is never popped.
        self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Breadcrumb {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Claim the top slot for a value or a nested structure.
    fn fill(&mut self, column: usize) -> Result<(), ParseError> {
        if self.checks_slots() && !self.top().pending {
            return Err(self.error("value already present", column));
        }
        self.top_mut().pending = false;
        Ok(())
    }

    /// Give a key or element that never got a value an explicit `null`.
    fn fill_null(&mut self, out: &mut Vec<Event>) {
        let top = self.top();
        if self.checks_slots() && top.pending && top.nesting != Nesting::Document {
            out.push(Event::Value(Scalar::null()));
            self.top_mut().pending = false;
        }
    }

    fn open(
        &mut self,
        nesting: Nesting,
        column: usize,
        out: &mut Vec<Event>,
    ) -> Result<(), ParseError> {
        self.fill(column)?;
        debug!(?nesting, column, line = self.line_num, "open");
        self.stack.push(Breadcrumb {
            nesting,
            column,
            pending: false,
        });
        out.push(match nesting {
            Nesting::Array => Event::StartArray,
            _ => Event::StartMapping,
        });
        Ok(())
    }

    fn close_top(&mut self, out: &mut Vec<Event>) {
        self.fill_null(out);
        let Some(crumb) = self.stack.pop() else {
            return;
        };
        debug!(nesting = ?crumb.nesting, column = crumb.column, line = self.line_num, "close");
        match crumb.nesting {
            Nesting::Array => out.push(Event::EndArray),
            Nesting::Mapping => out.push(Event::EndMapping),
            Nesting::Document => self.stack.push(crumb),
        }
    }

    /// Close every structure whose content starts right of `column`.
    fn close_deeper_than(&mut self, column: usize, out: &mut Vec<Event>) {
        while self.stack.len() > 1 && self.top().column > column {
            self.close_top(out);
        }
    }

    fn error(&self, reason: &'static str, column: usize) -> ParseError {
        ParseError::unrecognized(reason).with_location(&self.ctx, self.line_num, column)
    }

    fn parse_line(
        &mut self,
        mut tokens: &[Token],
        out: &mut Vec<Event>,
    ) -> Result<(), ParseError> {
        if tokens.iter().all(Token::is_blank) {
            return Ok(());
        }

        let mut column = 0;
        if tokens[0].is(TokenKind::Indent) {
            column = tokens[0].width();
            tokens = &tokens[1..];
        }

        if self.dedent == DedentMode::Close {
            self.close_deeper_than(column, out);
        }

        // A rejected line leaves no events of its own.
        let mark = out.len();
        let saved = self.stack.clone();
        let result = self.parse_content(tokens, column, out);
        if result.is_err() {
            out.truncate(mark);
            self.stack = saved;
        }
        result
    }

    fn parse_content(
        &mut self,
        mut tokens: &[Token],
        mut column: usize,
        out: &mut Vec<Event>,
    ) -> Result<(), ParseError> {
        let mut line_start = true;

        loop {
            let content = trim_blank_end(tokens);
            if content.len() == 1 && content[0].is(TokenKind::Word) {
                return self.scalar(&content[0].text, column, line_start, out);
            }

            if tokens.len() >= 2 && tokens[0].is(TokenKind::Dash) && tokens[1].is(TokenKind::Space)
            {
                self.item(column, out)?;
                column += 1 + tokens[1].width();
                tokens = &tokens[2..];
                if tokens.is_empty() {
                    return Ok(());
                }
                line_start = false;
                continue;
            }

            if let Some(i) = find_key_colon(tokens) {
                let key = concat(&tokens[..i]);
                let colon = column + width(&tokens[..i]);
                self.key(key, column, colon, out)?;

                column = colon + tokens[i].width();
                tokens = &tokens[i + 1..];
                if tokens.first().is_some_and(|t| t.is(TokenKind::Space)) {
                    column += tokens[0].width();
                    tokens = &tokens[1..];
                }
                if tokens.is_empty() {
                    return Ok(());
                }
                line_start = false;
                continue;
            }

            return self.scalar(&concat(content), column, line_start, out);
        }
    }

    fn scalar(
        &mut self,
        text: &str,
        column: usize,
        line_start: bool,
        out: &mut Vec<Event>,
    ) -> Result<(), ParseError> {
        let top = self.top();
        if self.checks_slots()
            && line_start
            && top.nesting != Nesting::Document
            && top.column == column
        {
            return Err(self.error("value at collection column", column));
        }
        self.fill(column)?;
        out.push(Event::value(text));
        Ok(())
    }

    fn item(&mut self, column: usize, out: &mut Vec<Event>) -> Result<(), ParseError> {
        if self.top().is(Nesting::Array, column) {
            self.fill_null(out);
        } else {
            self.open(Nesting::Array, column, out)?;
        }
        out.push(Event::Element);
        self.top_mut().pending = true;
        Ok(())
    }

    /// `column` is where the key starts, `colon` where its colon is.
    fn key(
        &mut self,
        key: String,
        column: usize,
        colon: usize,
        out: &mut Vec<Event>,
    ) -> Result<(), ParseError> {
        if self.dedent == DedentMode::Defer {
            self.open(Nesting::Mapping, colon, out)?;
            out.push(Event::Key(key));
            self.top_mut().pending = true;
            return Ok(());
        }

        if self.top().is(Nesting::Array, column) {
            let parent = self.stack[self.stack.len() - 2];
            if !parent.is(Nesting::Mapping, column) {
                return Err(self.error("key at sequence column", column));
            }
            self.close_top(out);
        }

        if self.top().is(Nesting::Mapping, column) {
            self.fill_null(out);
        } else {
            self.open(Nesting::Mapping, column, out)?;
        }
        out.push(Event::Key(key));
        self.top_mut().pending = true;
        Ok(())
    }
}

/// Index of the first colon that ends the line or is followed by a space.
fn find_key_colon(tokens: &[Token]) -> Option<usize> {
    (0..tokens.len()).find(|&i| {
        tokens[i].is(TokenKind::Colon)
            && tokens
                .get(i + 1)
                .map_or(true, |next| next.is(TokenKind::Space))
    })
}

/// Trailing whitespace is not content.
fn trim_blank_end(tokens: &[Token]) -> &[Token] {
    let end = tokens
        .iter()
        .rposition(|t| !t.is_blank())
        .map_or(0, |i| i + 1);
    &tokens[..end]
}

fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

fn width(tokens: &[Token]) -> usize {
    tokens.iter().map(Token::width).sum()
}

/// Parse a whole token sequence, collecting recoverable errors.
pub fn parse_tokens(
    tokens: impl IntoIterator<Item = Token>,
    options: &Options,
) -> (Vec<Event>, Vec<ParseError>) {
    let mut parser = Parser::new(options);
    let mut events = Vec::new();
    let mut errors = Vec::new();

    for token in tokens {
        if let Err(e) = parser.push(token, &mut events) {
            errors.push(e);
        }
    }
    if let Err(e) = parser.finish(&mut events) {
        errors.push(e);
    }

    (events, errors)
}
