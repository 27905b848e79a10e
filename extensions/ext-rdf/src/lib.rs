//! ext-rdf: RDF ingestion and export for KgView.
//!
//! Parses Turtle, N-Triples, N-Quads and RDF/XML, then compiles the triples
//! into the canonical graph following Linked Data conventions:
//!
//! - every IRI, blank node and literal is interned to one node id
//! - label predicates (`rdfs:label`, `schema:name`, ...) overwrite the
//!   subject's display name instead of creating literal nodes
//! - description predicates collapse into `props.description`
//! - `exprop:` predicates collapse into `props`, mirroring the exporter
//! - everything else becomes an edge
//!
//! ## Library API
//!
//! ```ignore
//! let triples = ext_rdf::parse_text(ttl, RdfFormat::Turtle)?;
//! let compiled = ext_rdf::compile(&triples, &ViewConfig::default())?;
//! let text = ext_rdf::export_rdf(&compiled.graph, RdfFormat::NTriples)?;
//! ```

pub mod compile;
pub mod export;
pub mod interner;
pub mod model;
pub mod parser;
pub mod vocab;

use kgv_common::{CancelToken, KgvResult, ViewConfig};
use tracing::info;

pub use compile::{CompileReport, CompiledGraph, compile, compile_with_cancel};
pub use export::{export_rdf, graph_triples};
pub use interner::TermInterner;
pub use model::{Term, Triple, local_name};
pub use parser::{RdfFormat, parse_file, parse_text};

/// Parse and compile RDF text in one step.
pub fn ingest_rdf(
    text: &str,
    format: RdfFormat,
    config: &ViewConfig,
    cancel: &CancelToken,
) -> KgvResult<CompiledGraph> {
    let triples = parse_text(text, format)?;
    cancel.check()?;
    let compiled = compile_with_cancel(&triples, config, cancel)?;
    info!(
        format = format.name(),
        triples = compiled.report.triples,
        nodes = compiled.report.nodes,
        edges = compiled.report.edges,
        "rdf ingested"
    );
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_turtle() {
        let ttl = r#"
            @prefix ex: <http://example.org/> .
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            ex:alice rdfs:label "Alice" ; ex:knows ex:bob .
        "#;
        let out = ingest_rdf(
            ttl,
            RdfFormat::Turtle,
            &ViewConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(out.graph.node_count(), 2);
        assert_eq!(out.graph.edge_count(), 1);
        assert_eq!(out.report.collapsed, 1);
    }

    #[test]
    fn ingest_checks_cancel_after_parse() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = ingest_rdf(
            "<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .",
            RdfFormat::NTriples,
            &ViewConfig::default(),
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, kgv_common::KgvError::Cancelled));
    }
}
