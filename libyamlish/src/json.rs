//! JSON renderer: a pure consumer of the event stream.
//!
//! The renderer keeps its own stack of open containers to know whether a
//! separator is due, since events carry no depth or position.

use crate::error::RenderError;
use crate::event::{Event, Scalar, ScalarKind};
use crate::options::JsonStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Mapping,
    Array,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    /// No member has been written yet.
    first: bool,
    /// A key or element was written and its value has not.
    pending: bool,
}

/// Streaming JSON writer driven by events.
///
/// Every value and opening bracket must follow a key or element, or be the
/// single top-level value. Anything else is [`RenderError::Unbalanced`].
#[derive(Debug, Default)]
pub struct JsonRenderer {
    style: JsonStyle,
    frames: Vec<Frame>,
    /// The top-level value has been started.
    root: bool,
}

impl JsonRenderer {
    pub fn new(style: JsonStyle) -> Self {
        Self {
            style,
            frames: Vec::new(),
            root: false,
        }
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Append the text for one event to `out`.
    pub fn render(&mut self, event: &Event, out: &mut String) -> Result<(), RenderError> {
        match event {
            Event::StartMapping => {
                self.place(event)?;
                self.open(Container::Mapping, '{', out);
            }
            Event::StartArray => {
                self.place(event)?;
                self.open(Container::Array, '[', out);
            }
            Event::Key(key) => {
                self.member(Container::Mapping, event, out)?;
                out.push_str(&encode_json_string(key));
                out.push(':');
                if self.style == JsonStyle::Pretty {
                    out.push(' ');
                }
            }
            Event::Element => self.member(Container::Array, event, out)?,
            Event::Value(scalar) => {
                self.place(event)?;
                out.push_str(&encode_json_scalar(scalar));
            }
            Event::EndMapping => self.close(Container::Mapping, '}', event, out)?,
            Event::EndArray => self.close(Container::Array, ']', event, out)?,
        }
        Ok(())
    }

    /// Check that every container was closed.
    pub fn finish(&self) -> Result<(), RenderError> {
        match self.frames.len() {
            0 => Ok(()),
            open => Err(RenderError::Unclosed(open)),
        }
    }

    /// Claim the slot a value or container is written into.
    fn place(&mut self, event: &Event) -> Result<(), RenderError> {
        match self.frames.last_mut() {
            None if !self.root => {
                self.root = true;
                Ok(())
            }
            Some(frame) if frame.pending => {
                frame.pending = false;
                Ok(())
            }
            _ => Err(RenderError::Unbalanced(event.name())),
        }
    }

    fn open(&mut self, container: Container, bracket: char, out: &mut String) {
        out.push(bracket);
        self.frames.push(Frame {
            container,
            first: true,
            pending: false,
        });
    }

    fn member(
        &mut self,
        container: Container,
        event: &Event,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let depth = self.frames.len();
        let frame = match self.frames.last_mut() {
            Some(frame) if frame.container == container && !frame.pending => frame,
            _ => return Err(RenderError::Unbalanced(event.name())),
        };
        if !frame.first {
            out.push(',');
        }
        frame.first = false;
        frame.pending = true;
        self.newline(depth, out);
        Ok(())
    }

    fn close(
        &mut self,
        container: Container,
        bracket: char,
        event: &Event,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let frame = match self.frames.pop() {
            Some(frame) if frame.container == container && !frame.pending => frame,
            Some(frame) => {
                self.frames.push(frame);
                return Err(RenderError::Unbalanced(event.name()));
            }
            None => return Err(RenderError::Unbalanced(event.name())),
        };
        if !frame.first {
            self.newline(self.frames.len(), out);
        }
        out.push(bracket);
        Ok(())
    }

    fn newline(&self, depth: usize, out: &mut String) {
        if self.style == JsonStyle::Pretty {
            out.push('\n');
            out.push_str(&"  ".repeat(depth));
        }
    }
}

/// Render a complete event sequence.
pub fn render_events<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    style: JsonStyle,
) -> Result<String, RenderError> {
    let mut renderer = JsonRenderer::new(style);
    let mut out = String::new();
    for event in events {
        renderer.render(event, &mut out)?;
    }
    renderer.finish()?;
    Ok(out)
}

fn encode_json_scalar(scalar: &Scalar) -> String {
    match scalar.kind {
        ScalarKind::String => encode_json_string(&scalar.text),
        ScalarKind::Number => normalize_number(&scalar.text),
        ScalarKind::Boolean => scalar.text.clone(),
        ScalarKind::Null => "null".to_string(),
    }
}

/// JSON wants digits on both sides of the dot and no leading zeros.
fn normalize_number(text: &str) -> String {
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text, None),
    };
    let int = int.trim_start_matches('0');
    let int = if int.is_empty() { "0" } else { int };
    match frac {
        Some("") => format!("{}.0", int),
        Some(frac) => format!("{}.{}", int, frac),
        None => int.to_string(),
    }
}

fn encode_json_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event::{Element, EndArray, EndMapping, StartArray, StartMapping};

    fn compact(events: &[Event]) -> String {
        render_events(events, JsonStyle::Compact).unwrap()
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(compact(&[]), "");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(compact(&[Event::value("foo")]), "\"foo\"");
        assert_eq!(compact(&[Event::value("4.5")]), "4.5");
        assert_eq!(compact(&[Event::value("false")]), "false");
        assert_eq!(compact(&[Event::value("null")]), "null");
    }

    #[test]
    fn test_comma_between_members_only() {
        let events = [
            StartMapping,
            Event::key("a"),
            Event::value("1"),
            Event::key("b"),
            Event::value("2"),
            EndMapping,
        ];
        let out = compact(&events);
        assert_eq!(out, "{\"a\":1,\"b\":2}");
        assert_eq!(out.matches(',').count(), 1);
    }

    #[test]
    fn test_nested_containers() {
        let events = [
            StartArray,
            Element,
            StartArray,
            Element,
            Event::value("x"),
            Element,
            Event::value("y"),
            EndArray,
            Element,
            StartMapping,
            Event::key("k"),
            Event::value("true"),
            EndMapping,
            EndArray,
        ];
        assert_eq!(compact(&events), "[[\"x\",\"y\"],{\"k\":true}]");
    }

    #[test]
    fn test_pretty() {
        let events = [
            StartMapping,
            Event::key("a"),
            StartArray,
            Element,
            Event::value("1"),
            Element,
            Event::value("2"),
            EndArray,
            Event::key("b"),
            StartMapping,
            EndMapping,
            EndMapping,
        ];
        let out = render_events(&events, JsonStyle::Pretty).unwrap();
        assert_eq!(out, "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {}\n}");
    }

    #[test]
    fn test_strings_are_escaped() {
        assert_eq!(
            compact(&[Event::value("say \"hi\"\t\\")]),
            r#""say \"hi\"\t\\""#
        );
        assert_eq!(compact(&[Event::value("\u{1}")]), "\"\\u0001\"");
    }

    #[test]
    fn test_depth_follows_containers() {
        let mut renderer = JsonRenderer::new(JsonStyle::Compact);
        let mut out = String::new();
        renderer.render(&StartArray, &mut out).unwrap();
        renderer.render(&Element, &mut out).unwrap();
        renderer.render(&StartMapping, &mut out).unwrap();
        assert_eq!(renderer.depth(), 2);
        renderer.render(&EndMapping, &mut out).unwrap();
        assert_eq!(renderer.depth(), 1);
        assert_eq!(out, "[{}");
    }

    #[test]
    fn test_key_outside_mapping() {
        let err = render_events(&[StartArray, Event::key("a")], JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("EMIT_KEY"));
    }

    #[test]
    fn test_mismatched_end() {
        let err = render_events(&[StartArray, EndMapping], JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("END_MAPPING"));
        let err = render_events(&[EndArray], JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("END_ARRAY"));
    }

    #[test]
    fn test_numbers_are_valid_json() {
        assert_eq!(compact(&[Event::value(".5")]), "0.5");
        assert_eq!(compact(&[Event::value("5.")]), "5.0");
        assert_eq!(compact(&[Event::value("007")]), "7");
        assert_eq!(compact(&[Event::value("00.50")]), "0.50");
        assert_eq!(compact(&[Event::value("0")]), "0");
        assert_eq!(compact(&[Event::value("10.25")]), "10.25");
    }

    #[test]
    fn test_second_top_level_value() {
        let err = render_events(&[Event::value("a"), Event::value("b")], JsonStyle::Compact)
            .unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("EMIT_VALUE"));
        let err = render_events(&[Event::value("a"), StartMapping], JsonStyle::Compact)
            .unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("START_MAPPING"));
    }

    #[test]
    fn test_value_needs_key_or_element() {
        let events = [StartMapping, Event::key("a"), Event::value("1"), Event::value("2")];
        let err = render_events(&events, JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("EMIT_VALUE"));

        let events = [StartMapping, Event::key("a"), Event::value("1"), StartMapping];
        let err = render_events(&events, JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("START_MAPPING"));

        let events = [StartArray, Element, Event::value("a"), Event::value("b")];
        let err = render_events(&events, JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("EMIT_VALUE"));

        let err = render_events(&[StartArray, StartArray], JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("START_ARRAY"));
    }

    #[test]
    fn test_key_without_value() {
        let events = [StartMapping, Event::key("a"), Event::key("b")];
        let err = render_events(&events, JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("EMIT_KEY"));

        let err = render_events(&[StartMapping, Event::key("a"), EndMapping], JsonStyle::Compact)
            .unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("END_MAPPING"));

        let err = render_events(&[StartArray, Element, EndArray], JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unbalanced("END_ARRAY"));
    }

    #[test]
    fn test_unclosed() {
        let err = render_events(&[StartMapping], JsonStyle::Compact).unwrap_err();
        assert_eq!(err, RenderError::Unclosed(1));
    }
}
