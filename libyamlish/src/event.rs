//! Structure events: the contract between the parser and any renderer.
//!
//! Events carry no depth. A consumer recovers nesting from the order of
//! `Start*`/`End*` pairs.

use std::fmt;

/// Type of a scalar payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Null,
}

impl ScalarKind {
    /// Display name of the payload kind.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::String => "STRING",
            ScalarKind::Number => "NUMBER",
            ScalarKind::Boolean => "BOOLEAN",
            ScalarKind::Null => "NULL",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A leaf value together with its literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    pub kind: ScalarKind,
    pub text: String,
}

impl Scalar {
    /// Classify plain scalar text.
    ///
    /// `true`/`false` are booleans, `null` is null, digits with at most one
    /// `.` are numbers, and everything else is a string.
    pub fn classify(text: &str) -> Self {
        let kind = match text {
            "true" | "false" => ScalarKind::Boolean,
            "null" => ScalarKind::Null,
            _ if is_numeric(text) => ScalarKind::Number,
            _ => ScalarKind::String,
        };
        Self {
            kind,
            text: text.to_string(),
        }
    }

    pub fn string(text: &str) -> Self {
        Self {
            kind: ScalarKind::String,
            text: text.to_string(),
        }
    }

    pub fn number(text: &str) -> Self {
        Self {
            kind: ScalarKind::Number,
            text: text.to_string(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            kind: ScalarKind::Boolean,
            text: value.to_string(),
        }
    }

    pub fn null() -> Self {
        Self {
            kind: ScalarKind::Null,
            text: "null".to_string(),
        }
    }
}

/// Check for digits with at most one `.` and at least one digit.
fn is_numeric(s: &str) -> bool {
    let mut has_dot = false;
    let mut has_digit = false;
    for c in s.chars() {
        match c {
            '.' if has_dot => return false,
            '.' => has_dot = true,
            '0'..='9' => has_digit = true,
            _ => return false,
        }
    }
    has_digit
}

/// One unit of structural information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartMapping,
    Key(String),
    Value(Scalar),
    EndMapping,
    StartArray,
    /// Separator marker preceding each array item.
    Element,
    EndArray,
}

impl Event {
    /// Shorthand for `Event::Value(Scalar::classify(text))`.
    pub fn value(text: &str) -> Self {
        Event::Value(Scalar::classify(text))
    }

    pub fn key(text: &str) -> Self {
        Event::Key(text.to_string())
    }

    /// Upper-case event kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartMapping => "START_MAPPING",
            Event::Key(_) => "EMIT_KEY",
            Event::Value(_) => "EMIT_VALUE",
            Event::EndMapping => "END_MAPPING",
            Event::StartArray => "START_ARRAY",
            Event::Element => "EMIT_ELEMENT",
            Event::EndArray => "END_ARRAY",
        }
    }

    /// Payload kind, for events that carry one. Keys are always strings.
    pub fn payload_kind(&self) -> Option<ScalarKind> {
        match self {
            Event::Key(_) => Some(ScalarKind::String),
            Event::Value(scalar) => Some(scalar.kind),
            _ => None,
        }
    }

    /// Payload literal text, for events that carry one.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Event::Key(key) => Some(key),
            Event::Value(scalar) => Some(&scalar.text),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.payload_kind(), self.payload()) {
            (Some(kind), Some(text)) => write!(f, "{} {} {:?}", self.name(), kind, text),
            _ => f.write_str(self.name()),
        }
    }
}
