//! Threaded conversion pipeline.
//!
//! ```text
//! reader --lines--> lexer --tokens--> parser --events--> renderer --chunks--> writer
//! ```
//!
//! Every arrow is a zero-capacity channel, so each handoff is a rendezvous
//! and a slow writer throttles the reader with no extra flow control. A
//! stage that stops early drops its receiver; the failed `send` upstream is
//! the signal to stop, never a panic.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, Scope, ScopedJoinHandle};

use tracing::{debug, warn};

use crate::error::{Error, ParseError, RenderError, Result};
use crate::event::Event;
use crate::json::JsonRenderer;
use crate::lexer::LineLexer;
use crate::options::{JsonStyle, Options, Output};
use crate::parser::Parser;
use crate::token::Token;

/// Summary of a finished conversion.
#[derive(Debug, Default)]
pub struct Report {
    /// Lines read from the input.
    pub lines: usize,
    /// Events produced by the parser.
    pub events: usize,
    /// Bytes handed to the writer.
    pub bytes: usize,
    /// Lines skipped as unrecognized (lenient mode only).
    pub diagnostics: Vec<ParseError>,
}

/// Convert everything `reader` yields and write the result to `writer`.
pub fn run<R, W>(reader: R, writer: W, options: &Options) -> Result<Report>
where
    R: BufRead,
    W: Write + Send,
{
    thread::scope(|s| {
        let (line_tx, line_rx) = sync_channel::<String>(0);
        let (token_tx, token_rx) = sync_channel::<Token>(0);
        let (event_tx, event_rx) = sync_channel::<Event>(0);
        let (chunk_tx, chunk_rx) = sync_channel::<String>(0);

        let lexer = spawn(s, "lexer", move || lex_stage(line_rx, token_tx))?;
        let parser = spawn(s, "parser", move || parse_stage(token_rx, event_tx, options))?;
        let output = options.output;
        let style = options.style;
        let renderer = spawn(s, "renderer", move || {
            render_stage(event_rx, chunk_tx, output, style)
        })?;
        let writer = spawn(s, "writer", move || write_stage(chunk_rx, writer))?;

        let read = feed_lines(reader, line_tx);

        let lines = join("lexer", lexer)?;
        let parsed = join("parser", parser)?;
        let rendered = join("renderer", renderer)?;
        let written = join("writer", writer)?;

        read?;
        let diagnostics = parsed?;
        let bytes = written?;
        let events = rendered?;

        debug!(lines, events, bytes, "pipeline finished");
        Ok(Report {
            lines,
            events,
            bytes,
            diagnostics,
        })
    })
}

fn spawn<'scope, 'env, T, F>(
    scope: &'scope Scope<'scope, 'env>,
    name: &'static str,
    f: F,
) -> Result<ScopedJoinHandle<'scope, T>>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn_scoped(scope, f)?;
    Ok(handle)
}

fn join<T>(name: &'static str, handle: ScopedJoinHandle<'_, T>) -> Result<T> {
    handle.join().map_err(|_| Error::StageFailed(name))
}

fn feed_lines<R: BufRead>(reader: R, lines: SyncSender<String>) -> io::Result<()> {
    for line in reader.lines() {
        if lines.send(line?).is_err() {
            debug!("lexer stopped, no longer reading");
            break;
        }
    }
    Ok(())
}

fn lex_stage(lines: Receiver<String>, tokens: SyncSender<Token>) -> usize {
    let mut count = 0;
    for line in lines {
        for token in LineLexer::new(&line) {
            if tokens.send(token).is_err() {
                debug!(line = count, "parser stopped");
                return count;
            }
        }
        count += 1;
    }
    count
}

/// Send a line's worth of events. Returns `false` once the receiver is gone.
fn forward(batch: &mut Vec<Event>, events: &SyncSender<Event>) -> bool {
    batch.drain(..).all(|event| events.send(event).is_ok())
}

fn parse_stage(
    tokens: Receiver<Token>,
    events: SyncSender<Event>,
    options: &Options,
) -> std::result::Result<Vec<ParseError>, ParseError> {
    let mut parser = Parser::new(options);
    let mut batch = Vec::new();
    let mut diagnostics = Vec::new();

    let mut check = |result: std::result::Result<(), ParseError>| match result {
        Err(e) if options.strict => Err(e),
        Err(e) => {
            warn!("skipping line: {}", e);
            diagnostics.push(e);
            Ok(())
        }
        Ok(()) => Ok(()),
    };

    for token in tokens {
        let result = parser.push(token, &mut batch);
        if !forward(&mut batch, &events) {
            debug!("renderer stopped");
            break;
        }
        check(result)?;
    }

    let result = parser.finish(&mut batch);
    forward(&mut batch, &events);
    check(result)?;

    Ok(diagnostics)
}

fn render_stage(
    events: Receiver<Event>,
    chunks: SyncSender<String>,
    output: Output,
    style: JsonStyle,
) -> std::result::Result<usize, RenderError> {
    let mut renderer = JsonRenderer::new(style);
    let mut count = 0;

    for event in events {
        count += 1;
        let chunk = match output {
            Output::Json => {
                let mut chunk = String::new();
                renderer.render(&event, &mut chunk)?;
                chunk
            }
            Output::Events => format!("{}\n", event),
        };
        if !chunk.is_empty() && chunks.send(chunk).is_err() {
            debug!("writer stopped");
            return Ok(count);
        }
    }

    if output == Output::Json {
        renderer.finish()?;
    }
    Ok(count)
}

fn write_stage<W: Write>(chunks: Receiver<String>, mut writer: W) -> io::Result<usize> {
    let mut written = 0;
    for chunk in chunks {
        writer.write_all(chunk.as_bytes())?;
        written += chunk.len();
    }
    writer.flush()?;
    Ok(written)
}
