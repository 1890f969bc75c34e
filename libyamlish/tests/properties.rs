//! Property-based tests for the lexer and parser.
//!
//! 1. **Round trip**: a line's token texts concatenate back to the line
//! 2. **Shape**: at most one leading indent, exactly one trailing newline
//! 3. **Maximal runs**: no empty tokens, no two adjacent spaces or words
//! 4. **Valid output**: any input yields valid JSON, with misplaced lines
//!    skipped; deferred streams stay balanced and are valid when rendered
//! 5. **Determinism**: the threaded pipeline matches the direct parse

use proptest::prelude::*;

use libyamlish::{
    convert_with_options, lex_line, parse, render_events, DedentMode, Event, JsonStyle, Options,
    TokenKind,
};

/// Lines built from the characters the lexer treats specially.
fn line() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just(' '),
            Just('\t'),
            Just('-'),
            Just(':'),
            Just('"'),
            Just('\''),
            Just('a'),
            Just('7'),
            Just('.'),
            Just('é'),
        ],
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect::<String>())
}

/// Documents made of indentation-heavy lines.
fn document() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        (0usize..6, prop_oneof![Just("- "), Just("key: "), Just("key:"), Just("")], line()),
        0..12,
    )
    .prop_map(|lines| {
        lines
            .into_iter()
            .map(|(indent, lead, rest)| format!("{}{}{}", " ".repeat(indent), lead, rest))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

proptest! {
    #[test]
    fn lexer_round_trips(line in line()) {
        let tokens = lex_line(&line);
        let text: String = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .map(|t| t.text.as_str())
            .collect();
        prop_assert_eq!(text, line);
    }

    #[test]
    fn lexer_shape(line in line()) {
        let tokens = lex_line(&line);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Newline));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Newline).count(), 1);
        for (i, token) in tokens.iter().enumerate() {
            if token.kind == TokenKind::Indent {
                prop_assert_eq!(i, 0);
                prop_assert!(token.text.chars().all(|c| c == ' '));
            }
        }
    }

    #[test]
    fn lexer_runs_are_maximal(line in line()) {
        let tokens = lex_line(&line);
        for token in &tokens {
            if token.kind != TokenKind::Newline {
                prop_assert!(!token.text.is_empty());
            }
        }
        for pair in tokens.windows(2) {
            let both = |kind: TokenKind| pair[0].kind == kind && pair[1].kind == kind;
            prop_assert!(!both(TokenKind::Space));
            prop_assert!(!both(TokenKind::Word));
        }
    }

    #[test]
    fn output_is_valid_json(doc in document()) {
        let parsed = parse(&doc, &Options::new()).unwrap();
        let json = render_events(&parsed.events, JsonStyle::Compact);
        prop_assert!(json.is_ok(), "{:?}: {:?}", doc, json);
        let json = json.unwrap();
        if !json.is_empty() {
            let value = serde_json::from_str::<serde_json::Value>(&json);
            prop_assert!(value.is_ok(), "{:?} -> {}", doc, json);
        }
    }

    #[test]
    fn deferred_events_are_balanced(doc in document()) {
        let parsed = parse(&doc, &Options::new().dedent(DedentMode::Defer)).unwrap();
        prop_assert!(parsed.diagnostics.is_empty());
        let count = |event: Event| parsed.events.iter().filter(|e| **e == event).count();
        prop_assert_eq!(count(Event::StartMapping), count(Event::EndMapping));
        prop_assert_eq!(count(Event::StartArray), count(Event::EndArray));
        // Whatever the renderer accepts is valid JSON.
        if let Ok(json) = render_events(&parsed.events, JsonStyle::Compact) {
            if !json.is_empty() {
                prop_assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
            }
        }
    }

    #[test]
    fn pipeline_matches_direct_parse(doc in document()) {
        let options = Options::new();
        let parsed = parse(&doc, &options).unwrap();
        let direct = render_events(&parsed.events, JsonStyle::Compact).unwrap();
        let (piped, report) = convert_with_options(&doc, &options).unwrap();
        prop_assert_eq!(piped, direct);
        prop_assert_eq!(report.events, parsed.events.len());
        prop_assert_eq!(report.diagnostics, parsed.diagnostics);
    }
}
