//! Parse error types and ariadne-based diagnostic rendering.

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::Simple;

use crate::span::Span;
use crate::token::Token;

/// Hint shown alongside every syntax error.
pub const USAGE: &str =
    "Use node:key=value, edge:key=value, filter node:key=value, or filter edge:key=value";

/// A located parse error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
    pub found: Option<String>,
    pub label: Option<&'static str>,
}

impl ParseError {
    pub fn empty_query() -> Self {
        Self {
            span: 0..0,
            message: "empty query".to_string(),
            expected: vec![],
            found: None,
            label: None,
        }
    }

    /// Convert a chumsky `Simple<Token>` error into our error type.
    pub fn from_chumsky(err: Simple<Token>) -> Self {
        let span = err.span();
        let message = format!("{err}");
        let mut expected: Vec<String> = err
            .expected()
            .map(|e| match e {
                Some(tok) => format!("{tok}"),
                None => "end of input".to_string(),
            })
            .collect();
        expected.sort();
        expected.dedup();
        let found = err.found().map(|t| format!("{t}"));
        let label = err.label();

        Self {
            span,
            message,
            expected,
            found,
            label,
        }
    }

    fn summary(&self) -> String {
        if self.expected.is_empty() {
            return self.message.clone();
        }
        let expected_str = self.expected.join(", ");
        match &self.found {
            Some(found) => format!("expected {expected_str}, found {found}"),
            None => format!("expected {expected_str}, found end of input"),
        }
    }

    /// Render this error as a rich diagnostic string using ariadne.
    pub fn render(&self, source_name: &str, source: &str) -> String {
        let mut buf = Vec::new();
        let msg = self.summary();
        let label_msg = match self.label {
            Some(label) => format!("in {label}"),
            None => msg.clone(),
        };

        let written = Report::build(ReportKind::Error, source_name, self.span.start)
            .with_message(&msg)
            .with_label(
                Label::new((source_name, self.span.clone()))
                    .with_message(label_msg)
                    .with_color(Color::Red),
            )
            .with_help(USAGE)
            .finish()
            .write((source_name, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{source_name}: {msg}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.summary(), self.span.start, self.span.end)
    }
}

impl std::error::Error for ParseError {}
