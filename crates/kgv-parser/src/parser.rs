//! Chumsky combinator parser for the four-verb query grammar.
//!
//! ```text
//! reset | help | ?
//! node : <key> = <value>
//! edge : <key> = <value>
//! filter node : <key> = <value>
//! filter edge : <key> = <value>
//! ```

use chumsky::prelude::*;
use smol_str::SmolStr;

use crate::ast::{Intent, PropertyQuery, Target};
use crate::token::Token;

type ParserError = Simple<Token>;

/// Keys are identifiers; keywords are accepted as keys too.
fn key() -> impl Parser<Token, SmolStr, Error = ParserError> + Clone {
    filter_map(|span, tok: Token| match tok {
        Token::Ident(name) => Ok(name),
        other => match other.keyword_text() {
            Some(text) => Ok(SmolStr::new_static(text)),
            None => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
        },
    })
    .labelled("key")
}

fn value() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! { Token::Value(v) => v }.labelled("value")
}

fn target() -> impl Parser<Token, Target, Error = ParserError> + Clone {
    just(Token::Node)
        .to(Target::Node)
        .or(just(Token::Edge).to(Target::Edge))
}

fn property_query() -> impl Parser<Token, PropertyQuery, Error = ParserError> + Clone {
    target()
        .then_ignore(just(Token::Colon))
        .then(key())
        .then_ignore(just(Token::Eq))
        .then(value())
        .map(|((target, key), value)| PropertyQuery { target, key, value })
}

/// Parse one complete command.
pub fn intent_parser() -> impl Parser<Token, Intent, Error = ParserError> {
    choice((
        just(Token::Reset).to(Intent::Reset),
        just(Token::Help).or(just(Token::Question)).to(Intent::Help),
        just(Token::Filter)
            .ignore_then(property_query().labelled("filter"))
            .map(Intent::Filter),
        property_query().map(Intent::Search),
    ))
    .then_ignore(end())
}
