use smol_str::SmolStr;

use crate::span::{Span, Spanned};
use crate::token::{Token, lookup_keyword};

/// Hand-written lexer producing a flat token stream.
///
/// The lexer is mode-aware: the first `=` switches it to value mode, and the
/// rest of the line (whitespace-trimmed) becomes a single [`Token::Value`].
/// Values may therefore contain spaces, `:` and further `=` signs.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    tokens: Vec<Spanned<Token>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    pub fn lex(mut self) -> Vec<Spanned<Token>> {
        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                break;
            };
            let start = self.pos;
            match ch {
                ':' => {
                    self.advance();
                    self.push(Token::Colon, start);
                }
                '=' => {
                    self.advance();
                    self.push(Token::Eq, start);
                    self.lex_value();
                }
                _ => self.lex_word(start),
            }
        }
        let end = self.source.len();
        self.tokens.push((Token::Eof, end..end));
        self.tokens
    }

    fn lex_value(&mut self) {
        self.skip_whitespace();
        let start = self.pos;
        let value = self.source[start..].trim_end();
        if !value.is_empty() {
            self.tokens
                .push((Token::Value(value.to_string()), start..start + value.len()));
        }
        self.pos = self.source.len();
    }

    fn lex_word(&mut self, start: usize) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == ':' || ch == '=' {
                break;
            }
            self.advance();
        }
        let word = &self.source[start..self.pos];
        let token = lookup_keyword(word).unwrap_or_else(|| Token::Ident(SmolStr::new(word)));
        self.push(token, start);
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    fn push(&mut self, token: Token, start: usize) {
        self.tokens.push((token, Span { start, end: self.pos }));
    }
}
