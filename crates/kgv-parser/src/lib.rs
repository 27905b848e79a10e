//! kgv-parser: lexer + chumsky parser for the KgView query language.
//!
//! The language has four verbs (`node:`, `edge:`, `filter node:`,
//! `filter edge:`) plus `reset` and `help`/`?`. Keywords are
//! case-insensitive and whitespace around `:` and `=` is ignored.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

use chumsky::Parser;

pub use ast::{Intent, PropertyQuery, Target};
pub use error::{ParseError, USAGE};

/// Parse one command line into an [`Intent`].
///
/// Anything that is not exactly one of the recognized forms is an error;
/// the first error found is returned.
pub fn parse(source: &str) -> Result<Intent, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::empty_query());
    }
    let tokens = lexer::Lexer::new(source).lex();

    let len = source.len();
    let stream = chumsky::Stream::from_iter(
        len..len + 1,
        tokens
            .into_iter()
            .filter(|(tok, _)| !matches!(tok, token::Token::Eof)),
    );

    parser::intent_parser().parse(stream).map_err(|errors| {
        errors
            .into_iter()
            .next()
            .map(ParseError::from_chumsky)
            .unwrap_or_else(ParseError::empty_query)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(target: Target, key: &str, value: &str) -> Intent {
        Intent::Search(PropertyQuery::new(target, key, value))
    }

    fn filter(target: Target, key: &str, value: &str) -> Intent {
        Intent::Filter(PropertyQuery::new(target, key, value))
    }

    #[test]
    fn reset_and_help() {
        assert_eq!(parse("reset"), Ok(Intent::Reset));
        assert_eq!(parse("  RESET "), Ok(Intent::Reset));
        assert_eq!(parse("Help"), Ok(Intent::Help));
        assert_eq!(parse("?"), Ok(Intent::Help));
    }

    #[test]
    fn node_and_edge_search() {
        assert_eq!(
            parse("node:label=Alice"),
            Ok(search(Target::Node, "label", "Alice"))
        );
        assert_eq!(
            parse("EDGE : label = knows well"),
            Ok(search(Target::Edge, "label", "knows well"))
        );
    }

    #[test]
    fn filters() {
        assert_eq!(
            parse("filter node:type=Person"),
            Ok(filter(Target::Node, "type", "Person"))
        );
        assert_eq!(
            parse("Filter   EDGE:label=knows"),
            Ok(filter(Target::Edge, "label", "knows"))
        );
    }

    #[test]
    fn value_is_rest_of_line() {
        assert_eq!(
            parse("node:iri=http://ex.org/a?x=1"),
            Ok(search(Target::Node, "iri", "http://ex.org/a?x=1"))
        );
    }

    #[test]
    fn keyword_keys() {
        assert_eq!(
            parse("node:filter=on"),
            Ok(search(Target::Node, "filter", "on"))
        );
    }

    #[test]
    fn syntax_errors() {
        for bad in [
            "foo bar",
            "node label=Alice",
            "node:label=",
            "node:label",
            "filter:label=x",
            "filter",
            "node:first name=x",
            "node:a:b=c",
            "reset now",
            "help me",
            "nodes:label=x",
            "filternode:label=x",
            "node edge:label=x",
        ] {
            assert!(parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn empty_query() {
        let err = parse("   ").unwrap_err();
        assert_eq!(err.message, "empty query");
    }

    #[test]
    fn error_is_located() {
        let err = parse("node label=Alice").unwrap_err();
        assert_eq!(err.span, 5..10);
        assert_eq!(err.found.as_deref(), Some("label"));
        assert!(err.expected.iter().any(|e| e == ":"));
    }
}
