//! RDF text parsing using oxttl (Turtle/N-Triples/N-Quads) and oxrdfxml (RDF/XML).

use std::fs;

use kgv_common::{KgvError, KgvResult};
use oxrdf::vocab::{rdf, xsd};
use oxttl::{NQuadsParser, NTriplesParser, TurtleParser};

use crate::model::{Term, Triple};

/// Supported RDF serializations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RdfFormat {
    #[default]
    Turtle,
    NTriples,
    NQuads,
    RdfXml,
}

impl RdfFormat {
    /// Pick a parser from a content-type hint. Unknown hints fall back to Turtle.
    pub fn from_content_type(content_type: &str) -> Self {
        let ct = content_type.to_ascii_lowercase();
        if ct.contains("n-triples") || ct.contains("ntriples") {
            Self::NTriples
        } else if ct.contains("n-quads") || ct.contains("nquads") {
            Self::NQuads
        } else if ct.contains("rdf+xml") {
            Self::RdfXml
        } else {
            Self::Turtle
        }
    }

    /// Detect the format from a file extension.
    ///
    /// `.ttl` (Turtle), `.nt` (N-Triples), `.nq` (N-Quads), `.rdf`/`.owl`/`.xml` (RDF/XML).
    pub fn from_path(path: &str) -> Option<Self> {
        let lower = path.to_lowercase();
        if lower.ends_with(".ttl") {
            Some(Self::Turtle)
        } else if lower.ends_with(".nt") {
            Some(Self::NTriples)
        } else if lower.ends_with(".nq") {
            Some(Self::NQuads)
        } else if lower.ends_with(".rdf") || lower.ends_with(".owl") || lower.ends_with(".xml") {
            Some(Self::RdfXml)
        } else {
            None
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Turtle => "text/turtle",
            Self::NTriples => "application/n-triples",
            Self::NQuads => "application/n-quads",
            Self::RdfXml => "application/rdf+xml",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Turtle => "Turtle",
            Self::NTriples => "N-Triples",
            Self::NQuads => "N-Quads",
            Self::RdfXml => "RDF/XML",
        }
    }
}

/// Parse RDF text into triples. Graph names of quads are ignored.
///
/// The whole input must parse: the first syntax error aborts with
/// `KgvError::Parse` and no partial triples are returned.
pub fn parse_text(text: &str, format: RdfFormat) -> KgvResult<Vec<Triple>> {
    if text.trim().is_empty() {
        return Err(KgvError::Parse("no text provided".into()));
    }
    let input = text.as_bytes();
    match format {
        RdfFormat::Turtle => collect_triples(TurtleParser::new().for_reader(input), format),
        RdfFormat::NTriples => collect_triples(NTriplesParser::new().for_reader(input), format),
        RdfFormat::RdfXml => {
            collect_triples(oxrdfxml::RdfXmlParser::new().for_reader(input), format)
        }
        RdfFormat::NQuads => {
            let mut triples = Vec::new();
            for result in NQuadsParser::new().for_reader(input) {
                let quad = result
                    .map_err(|e| KgvError::Parse(format!("{} parse error: {e}", format.name())))?;
                triples.push(convert_triple(quad.subject, quad.predicate, quad.object));
            }
            Ok(triples)
        }
    }
}

/// Read and parse an RDF file. The format is detected by extension,
/// defaulting to Turtle.
pub fn parse_file(path: &str) -> KgvResult<Vec<Triple>> {
    let text = fs::read_to_string(path)
        .map_err(|e| KgvError::Import(format!("cannot read '{path}': {e}")))?;
    parse_text(&text, RdfFormat::from_path(path).unwrap_or_default())
}

/// Collect triples from any parser that yields `Result<oxrdf::Triple, _>`.
fn collect_triples<I, E>(parser: I, format: RdfFormat) -> KgvResult<Vec<Triple>>
where
    I: Iterator<Item = Result<oxrdf::Triple, E>>,
    E: std::fmt::Display,
{
    let mut triples = Vec::new();
    for result in parser {
        let t = result.map_err(|e| KgvError::Parse(format!("{} parse error: {e}", format.name())))?;
        triples.push(convert_triple(t.subject, t.predicate, t.object));
    }
    Ok(triples)
}

fn convert_triple(
    subject: oxrdf::NamedOrBlankNode,
    predicate: oxrdf::NamedNode,
    object: oxrdf::Term,
) -> Triple {
    Triple {
        subject: match subject {
            oxrdf::NamedOrBlankNode::NamedNode(n) => Term::Iri(n.into_string()),
            oxrdf::NamedOrBlankNode::BlankNode(b) => Term::Blank(b.as_str().to_string()),
        },
        predicate: predicate.into_string(),
        object: convert_term(object),
    }
}

fn convert_term(term: oxrdf::Term) -> Term {
    match term {
        oxrdf::Term::NamedNode(n) => Term::Iri(n.into_string()),
        oxrdf::Term::BlankNode(b) => Term::Blank(b.as_str().to_string()),
        oxrdf::Term::Literal(lit) => {
            let dt = lit.datatype();
            let datatype = if dt == rdf::LANG_STRING || dt == xsd::STRING {
                None
            } else {
                Some(dt.as_str().to_string())
            };
            Term::Literal {
                value: lit.value().to_string(),
                lang: lit.language().map(|l| l.to_string()),
                datatype,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_content_type() {
        assert_eq!(
            RdfFormat::from_content_type("application/n-triples"),
            RdfFormat::NTriples
        );
        assert_eq!(
            RdfFormat::from_content_type("application/N-Quads"),
            RdfFormat::NQuads
        );
        assert_eq!(
            RdfFormat::from_content_type("application/rdf+xml; charset=utf-8"),
            RdfFormat::RdfXml
        );
        assert_eq!(RdfFormat::from_content_type("text/turtle"), RdfFormat::Turtle);
        assert_eq!(RdfFormat::from_content_type(""), RdfFormat::Turtle);
    }

    #[test]
    fn format_from_path() {
        assert_eq!(RdfFormat::from_path("a.TTL"), Some(RdfFormat::Turtle));
        assert_eq!(RdfFormat::from_path("a.nt"), Some(RdfFormat::NTriples));
        assert_eq!(RdfFormat::from_path("a.nq"), Some(RdfFormat::NQuads));
        assert_eq!(RdfFormat::from_path("onto.owl"), Some(RdfFormat::RdfXml));
        assert_eq!(RdfFormat::from_path("a.json"), None);
    }

    #[test]
    fn parse_turtle_text() {
        let ttl = r#"
            @prefix ex: <http://example.org/> .
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            ex:alice rdfs:label "Alice"@en ;
                     ex:knows ex:bob ;
                     ex:age 30 ;
                     ex:note "hi"^^<http://www.w3.org/2001/XMLSchema#string> .
            _:b1 ex:knows ex:alice .
        "#;
        let triples = parse_text(ttl, RdfFormat::Turtle).unwrap();
        assert_eq!(triples.len(), 5);
        assert_eq!(triples[0].subject, Term::iri("http://example.org/alice"));
        assert_eq!(triples[0].object, Term::lang_literal("Alice", "en"));
        assert_eq!(triples[1].object, Term::iri("http://example.org/bob"));
        assert_eq!(
            triples[2].object,
            Term::typed_literal("30", "http://www.w3.org/2001/XMLSchema#integer")
        );
        assert_eq!(triples[3].object, Term::literal("hi"));
        assert!(matches!(triples[4].subject, Term::Blank(_)));
    }

    #[test]
    fn parse_ntriples_text() {
        let nt = "<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .\n\
                  <http://ex.org/a> <http://ex.org/q> \"v\" .\n";
        let triples = parse_text(nt, RdfFormat::NTriples).unwrap();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[1].predicate, "http://ex.org/q");
    }

    #[test]
    fn parse_nquads_ignores_graph_name() {
        let nq = "<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> <http://ex.org/g> .\n";
        let triples = parse_text(nq, RdfFormat::NQuads).unwrap();
        assert_eq!(
            triples,
            vec![Triple::new(
                Term::iri("http://ex.org/a"),
                "http://ex.org/p",
                Term::iri("http://ex.org/b"),
            )]
        );
    }

    #[test]
    fn parse_rdfxml_text() {
        let xml = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/alice">
    <ex:knows rdf:resource="http://example.org/bob"/>
  </rdf:Description>
</rdf:RDF>"#;
        let triples = parse_text(xml, RdfFormat::RdfXml).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].object, Term::iri("http://example.org/bob"));
    }

    #[test]
    fn empty_text_is_rejected() {
        let err = parse_text("  \n", RdfFormat::Turtle).unwrap_err();
        assert!(matches!(err, KgvError::Parse(ref m) if m == "no text provided"));
    }

    #[test]
    fn syntax_error_aborts() {
        let err = parse_text("<http://ex.org/a> <http://ex.org/p> .", RdfFormat::Turtle)
            .unwrap_err();
        assert!(matches!(err, KgvError::Parse(_)));
    }
}
