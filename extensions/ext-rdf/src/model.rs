//! RDF data model types for the triple → canonical graph mapping.

use std::borrow::Cow;

/// A parsed RDF triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
    /// Subject term (IRI or blank node).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: String,
    /// Object term.
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// An RDF term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named resource.
    Iri(String),
    /// A blank node, by its document-scoped label (without `_:`).
    Blank(String),
    /// A literal value with optional language tag and XSD datatype.
    /// Plain and `xsd:string` literals carry no datatype.
    Literal {
        value: String,
        lang: Option<String>,
        datatype: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(id.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            lang: Some(lang.into()),
            datatype: None,
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            lang: None,
            datatype: Some(datatype.into()),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }
}

/// Percent-decode a string, keeping the raw text when it is not valid UTF-8.
pub fn percent_decode(s: &str) -> Cow<'_, str> {
    urlencoding::decode(s).unwrap_or(Cow::Borrowed(s))
}

/// Extract the local name of an IRI: the percent-decoded text after the
/// last `/`, `#` or `:`. Falls back to the whole IRI when that is empty.
pub fn local_name(iri: &str) -> String {
    let decoded = percent_decode(iri);
    let tail = decoded
        .rfind(['/', '#', ':'])
        .map(|idx| &decoded[idx + 1..])
        .unwrap_or(&decoded);
    if tail.is_empty() {
        decoded.to_string()
    } else {
        tail.to_string()
    }
}

/// Literal values that are really links (`http://`, `https://`, `www.`).
/// Such literals never become nodes.
pub fn looks_like_url(value: &str) -> bool {
    let head: String = value.chars().take(8).collect::<String>().to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://") || head.starts_with("www.")
}

/// English language tags: `en` and any `en-*` subtag, case-insensitive.
pub fn is_english(lang: Option<&str>) -> bool {
    match lang {
        Some(tag) => {
            let tag = tag.to_ascii_lowercase();
            tag == "en" || tag.starts_with("en-")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("http://xmlns.com/foaf/0.1/Person"), "Person");
        assert_eq!(
            local_name("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            "type"
        );
        assert_eq!(local_name("urn:isbn:0451450523"), "0451450523");
        assert_eq!(local_name("Person"), "Person");
    }

    #[test]
    fn local_name_is_percent_decoded() {
        assert_eq!(local_name("http://ex.org/New%20York"), "New York");
        assert_eq!(local_name("http://ex.org/caf%C3%A9"), "café");
    }

    #[test]
    fn local_name_of_trailing_slash_keeps_iri() {
        assert_eq!(local_name("http://ex.org/"), "http://ex.org/");
    }

    #[test]
    fn url_like_literals() {
        assert!(looks_like_url("http://example.org"));
        assert!(looks_like_url("HTTPS://EXAMPLE.ORG/x"));
        assert!(looks_like_url("www.example.org"));
        assert!(!looks_like_url("see http://example.org"));
        assert!(!looks_like_url("Alice"));
    }

    #[test]
    fn english_tags() {
        assert!(is_english(Some("en")));
        assert!(is_english(Some("EN-gb")));
        assert!(!is_english(Some("fr")));
        assert!(!is_english(Some("eng")));
        assert!(!is_english(None));
    }
}
