use std::collections::HashMap;
use std::sync::LazyLock;

use smol_str::SmolStr;

/// Tokens of the query language.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    // Keywords
    Reset,
    Help,
    Question,
    Node,
    Edge,
    Filter,

    // Punctuation
    Colon,
    Eq,

    /// A run of characters other than whitespace, `:` and `=`.
    Ident(SmolStr),
    /// Everything after the first `=`, trimmed.
    Value(String),

    Eof,
}

impl Token {
    /// Source spelling of a keyword, for keys that happen to be keywords.
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            Self::Reset => Some("reset"),
            Self::Help => Some("help"),
            Self::Question => Some("?"),
            Self::Node => Some("node"),
            Self::Edge => Some("edge"),
            Self::Filter => Some("filter"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ident(s) => write!(f, "{s}"),
            Self::Value(s) => write!(f, "'{s}'"),
            Self::Colon => write!(f, ":"),
            Self::Eq => write!(f, "="),
            Self::Eof => write!(f, "end of input"),
            kw => write!(f, "{}", kw.keyword_text().unwrap_or_default().to_uppercase()),
        }
    }
}

static KEYWORDS: LazyLock<HashMap<&'static str, Token>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("reset", Token::Reset);
    m.insert("help", Token::Help);
    m.insert("?", Token::Question);
    m.insert("node", Token::Node);
    m.insert("edge", Token::Edge);
    m.insert("filter", Token::Filter);
    m
});

/// Look up whether a word is a keyword. Keywords are case-insensitive.
pub fn lookup_keyword(word: &str) -> Option<Token> {
    let lower = word.to_ascii_lowercase();
    KEYWORDS.get(lower.as_str()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_case_insensitive() {
        assert_eq!(lookup_keyword("FILTER"), Some(Token::Filter));
        assert_eq!(lookup_keyword("filter"), Some(Token::Filter));
        assert_eq!(lookup_keyword("Node"), Some(Token::Node));
        assert_eq!(lookup_keyword("?"), Some(Token::Question));
    }

    #[test]
    fn non_keyword_returns_none() {
        assert_eq!(lookup_keyword("label"), None);
        assert_eq!(lookup_keyword("nodes"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Token::Node.to_string(), "NODE");
        assert_eq!(Token::Ident("label".into()).to_string(), "label");
        assert_eq!(Token::Eq.to_string(), "=");
    }
}
