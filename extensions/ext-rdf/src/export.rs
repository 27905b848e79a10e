//! Canonical graph → RDF text, inverse to the compiler's collapsing rules.

use kgv_common::{KgvError, KgvResult};
use kgv_types::{Graph, Node, NodeKind};
use oxrdf::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term as RdfTerm, Triple};
use oxttl::TurtleSerializer;
use tracing::{debug, warn};

use crate::model::local_name;
use crate::parser::RdfFormat;
use crate::vocab::{EX, EXPROP, RDFS, RDFS_LABEL, SCHEMA, SCHEMA_DESCRIPTION, slug};

const PREFIXES: &[(&str, &str)] = &[
    ("rdfs", RDFS),
    ("schema", SCHEMA),
    ("ex", EX),
    ("exprop", EXPROP),
];

/// Serialize the whole graph (hidden entities included) as Turtle or N-Triples.
pub fn export_rdf(graph: &Graph, format: RdfFormat) -> KgvResult<String> {
    let triples = graph_triples(graph)?;
    debug!(triples = triples.len(), format = format.name(), "rdf export");
    match format {
        RdfFormat::Turtle => write_turtle(&triples),
        RdfFormat::NTriples => Ok(write_ntriples(&triples)),
        other => Err(KgvError::Export(format!(
            "{} export is not supported",
            other.name()
        ))),
    }
}

/// Map the graph onto RDF triples.
///
/// Literal nodes appear only as objects. Edge properties have no RDF
/// counterpart and are not emitted.
pub fn graph_triples(graph: &Graph) -> KgvResult<Vec<Triple>> {
    let rdfs_label = NamedNode::new_unchecked(RDFS_LABEL);
    let description = NamedNode::new_unchecked(SCHEMA_DESCRIPTION);
    let mut triples = Vec::new();

    for node in graph.nodes() {
        let Some(subject) = subject_term(node) else {
            continue;
        };
        if node.name != default_name(&subject) {
            triples.push(Triple::new(
                subject.clone(),
                rdfs_label.clone(),
                Literal::new_simple_literal(&node.name),
            ));
        }
        for (key, value) in &node.props {
            let predicate = if key == "description" {
                description.clone()
            } else {
                exprop(key)?
            };
            triples.push(Triple::new(
                subject.clone(),
                predicate,
                Literal::new_simple_literal(value),
            ));
        }
    }

    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.node(edge.from), graph.node(edge.to)) else {
            continue;
        };
        let Some(subject) = subject_term(from) else {
            debug!(edge = %edge.id, "skipping edge from literal node");
            continue;
        };
        let predicate = match edge.iri.as_deref().map(NamedNode::new) {
            Some(Ok(iri)) => iri,
            _ => exprop(&edge.label)?,
        };
        triples.push(Triple::new(subject, predicate, object_term(to)?));
    }
    Ok(triples)
}

fn write_turtle(triples: &[Triple]) -> KgvResult<String> {
    let mut serializer = TurtleSerializer::new();
    for (prefix, iri) in PREFIXES {
        serializer = serializer
            .with_prefix(*prefix, *iri)
            .map_err(|e| KgvError::Export(e.to_string()))?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in triples {
        writer.serialize_triple(triple)?;
    }
    let bytes = writer.finish()?;
    String::from_utf8(bytes).map_err(|e| KgvError::Export(e.to_string()))
}

fn write_ntriples(triples: &[Triple]) -> String {
    let mut out = String::new();
    for triple in triples {
        out.push_str(&triple.to_string());
        out.push_str(" .\n");
    }
    out
}

fn minted_iri(node: &Node) -> NamedNode {
    NamedNode::new_unchecked(format!("{EX}node/{}", node.id))
}

fn subject_term(node: &Node) -> Option<NamedOrBlankNode> {
    let term = match &node.kind {
        NodeKind::Iri { iri } => match NamedNode::new(iri.as_str()) {
            Ok(n) => n.into(),
            Err(e) => {
                warn!(node = %node.id, %iri, "invalid IRI, minting one: {e}");
                minted_iri(node).into()
            }
        },
        NodeKind::BlankNode { bnode } => match BlankNode::new(bnode.as_str()) {
            Ok(b) => b.into(),
            Err(_) => minted_iri(node).into(),
        },
        NodeKind::Plain => minted_iri(node).into(),
        NodeKind::Literal { .. } => return None,
    };
    Some(term)
}

fn object_term(node: &Node) -> KgvResult<RdfTerm> {
    if let NodeKind::Literal {
        value,
        lang,
        datatype,
    } = &node.kind
    {
        let literal = match (lang, datatype) {
            (Some(lang), _) => Literal::new_language_tagged_literal(value, lang)
                .map_err(|e| KgvError::Export(format!("node {}: {e}", node.id)))?,
            (None, Some(dt)) => {
                let dt = NamedNode::new(dt.as_str())
                    .map_err(|e| KgvError::Export(format!("node {}: {e}", node.id)))?;
                Literal::new_typed_literal(value, dt)
            }
            (None, None) => Literal::new_simple_literal(value),
        };
        return Ok(literal.into());
    }
    subject_term(node)
        .map(RdfTerm::from)
        .ok_or_else(|| KgvError::Export(format!("node {} has no RDF term", node.id)))
}

/// What the compiler would name this subject if no label triple existed.
fn default_name(subject: &NamedOrBlankNode) -> String {
    match subject {
        NamedOrBlankNode::NamedNode(n) => local_name(n.as_str()),
        NamedOrBlankNode::BlankNode(b) => format!("_:{}", b.as_str()),
    }
}

fn exprop(key: &str) -> KgvResult<NamedNode> {
    let mut local = slug(key);
    if local.is_empty() {
        local.push_str("related");
    }
    NamedNode::new(format!("{EXPROP}{local}")).map_err(|e| KgvError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::parser::parse_text;
    use kgv_common::{EdgeId, NodeId, ViewConfig};
    use kgv_types::Edge;

    fn sample() -> Graph {
        let alice = Node::new(
            NodeId(1),
            NodeKind::Iri {
                iri: "http://ex.org/alice".into(),
            },
            "Alice Liddell",
            "Alice Liddell",
        )
        .with_prop("description", "A curious girl")
        .with_prop("home town", "Oxford");
        let rabbit = Node::plain(NodeId(2), "White Rabbit");
        let age = Node::new(
            NodeId(3),
            NodeKind::Literal {
                value: "7".into(),
                lang: None,
                datatype: Some("http://www.w3.org/2001/XMLSchema#integer".into()),
            },
            "7",
            "7",
        );
        let edges = vec![
            Edge::new(EdgeId::synthetic(1), NodeId(1), NodeId(2), "follows"),
            Edge::new(EdgeId::synthetic(2), NodeId(1), NodeId(3), "age")
                .with_iri("http://ex.org/age"),
        ];
        Graph::from_parts(vec![alice, rabbit, age], edges).unwrap()
    }

    #[test]
    fn ntriples_lines() {
        let nt = export_rdf(&sample(), RdfFormat::NTriples).unwrap();
        assert!(nt.contains(
            "<http://ex.org/alice> <http://www.w3.org/2000/01/rdf-schema#label> \"Alice Liddell\" .\n"
        ));
        assert!(nt.contains(
            "<http://ex.org/alice> <http://example.org/prop/home_town> \"Oxford\" .\n"
        ));
        assert!(nt.contains(
            "<http://ex.org/alice> <http://example.org/prop/follows> <http://example.org/node/2> .\n"
        ));
        assert!(nt.contains("\"7\"^^<http://www.w3.org/2001/XMLSchema#integer>"));
    }

    #[test]
    fn default_label_not_emitted() {
        let node = Node::new(
            NodeId(1),
            NodeKind::Iri {
                iri: "http://ex.org/bob".into(),
            },
            "bob",
            "bob",
        );
        let graph = Graph::from_parts(vec![node], vec![]).unwrap();
        assert!(graph_triples(&graph).unwrap().is_empty());
    }

    #[test]
    fn turtle_round_trip() {
        let ttl = export_rdf(&sample(), RdfFormat::Turtle).unwrap();
        assert!(ttl.contains("@prefix exprop: <http://example.org/prop/>"));

        let triples = parse_text(&ttl, RdfFormat::Turtle).unwrap();
        let graph = compile(&triples, &ViewConfig::default()).unwrap().graph;

        let alice = graph
            .nodes()
            .iter()
            .find(|n| n.name == "Alice Liddell")
            .unwrap();
        assert_eq!(
            alice.props.get("description").map(String::as_str),
            Some("A curious girl")
        );
        assert_eq!(alice.props.get("home town").map(String::as_str), Some("Oxford"));

        assert!(graph.nodes().iter().any(|n| n.name == "White Rabbit"));
        assert_eq!(graph.edge_count(), 2);
        let labels: Vec<_> = graph.edges().iter().map(|e| e.label.as_str()).collect();
        assert!(labels.contains(&"follows"));
        assert!(labels.contains(&"age"));
    }

    #[test]
    fn nquads_export_is_unsupported() {
        let err = export_rdf(&sample(), RdfFormat::NQuads).unwrap_err();
        assert!(matches!(err, KgvError::Export(_)));
    }
}
