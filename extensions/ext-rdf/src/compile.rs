//! Two-pass compilation of RDF triples into the canonical graph.
//!
//! Pass 1 walks every triple and records annotation predicates (labels,
//! descriptions, `exprop:` properties) against their subject. Pass 2 walks
//! the triples again and materializes everything else as edges. Annotations
//! are applied last, so a label triple that appears after the statements
//! about its subject still wins.

use hashbrown::{HashMap, HashSet};
use kgv_common::{CancelToken, EdgeId, KgvResult, NodeId, ViewConfig};
use kgv_types::{Edge, Graph, Props, truncate_label};
use tracing::debug;

use crate::interner::TermInterner;
use crate::model::{Term, Triple, is_english, local_name, looks_like_url};
use crate::vocab::{TripleRole, classify};

const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Counters describing one compile run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub triples: usize,
    pub nodes: usize,
    pub edges: usize,
    /// Triples folded into node labels or properties.
    pub collapsed: usize,
    /// Statements whose literal object looked like a URL.
    pub url_literals_dropped: usize,
    pub duplicate_statements: usize,
}

#[derive(Clone, Debug)]
pub struct CompiledGraph {
    pub graph: Graph,
    pub report: CompileReport,
}

/// Compile triples into a fresh graph. Ids start at 1 on every call.
pub fn compile(triples: &[Triple], config: &ViewConfig) -> KgvResult<CompiledGraph> {
    compile_with_cancel(triples, config, &CancelToken::new())
}

/// Like [`compile`], polling `cancel` as it walks the triples.
pub fn compile_with_cancel(
    triples: &[Triple],
    config: &ViewConfig,
    cancel: &CancelToken,
) -> KgvResult<CompiledGraph> {
    let mut interner = TermInterner::new(config.label_max_chars);
    let mut report = CompileReport {
        triples: triples.len(),
        ..Default::default()
    };

    let annotations = collect_annotations(triples, &mut interner, cancel, &mut report)?;
    debug!(
        subjects = annotations.len(),
        collapsed = report.collapsed,
        "rdf pass 1 complete"
    );

    let edges = build_edges(
        triples,
        &mut interner,
        config.label_max_chars,
        cancel,
        &mut report,
    )?;
    debug!(edges = edges.len(), "rdf pass 2 complete");

    apply_annotations(annotations, &mut interner, config.label_max_chars);

    let graph = Graph::from_parts(interner.into_nodes(), edges)?;
    report.nodes = graph.node_count();
    report.edges = graph.edge_count();
    Ok(CompiledGraph { graph, report })
}

/// A candidate label or description with its language preference.
struct Preferred {
    value: String,
    english: bool,
}

impl Preferred {
    /// English beats any other tag; among equals the newest wins.
    fn offer(slot: &mut Option<Self>, value: &str, lang: Option<&str>) {
        let english = is_english(lang);
        let replace = match slot {
            Some(current) => english || !current.english,
            None => true,
        };
        if replace {
            *slot = Some(Self {
                value: value.to_string(),
                english,
            });
        }
    }
}

#[derive(Default)]
struct Annotation {
    label: Option<Preferred>,
    description: Option<Preferred>,
    props: Props,
}

fn collect_annotations(
    triples: &[Triple],
    interner: &mut TermInterner,
    cancel: &CancelToken,
    report: &mut CompileReport,
) -> KgvResult<HashMap<NodeId, Annotation>> {
    let mut annotations: HashMap<NodeId, Annotation> = HashMap::new();
    for (i, triple) in triples.iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 {
            cancel.check()?;
        }
        let role = classify(triple);
        if role == TripleRole::Statement {
            continue;
        }
        let Term::Literal { value, lang, .. } = &triple.object else {
            continue;
        };
        let subject = interner.intern(&triple.subject);
        let entry = annotations.entry(subject).or_default();
        match role {
            TripleRole::Label => Preferred::offer(&mut entry.label, value, lang.as_deref()),
            TripleRole::Description => {
                Preferred::offer(&mut entry.description, value, lang.as_deref())
            }
            TripleRole::Property(key) => {
                entry.props.insert(key, value.clone());
            }
            TripleRole::Statement => {}
        }
        report.collapsed += 1;
    }
    Ok(annotations)
}

fn build_edges(
    triples: &[Triple],
    interner: &mut TermInterner,
    label_max_chars: usize,
    cancel: &CancelToken,
    report: &mut CompileReport,
) -> KgvResult<Vec<Edge>> {
    let mut edges = Vec::new();
    let mut seen: HashSet<(NodeId, &str, NodeId)> = HashSet::new();
    let mut predicate_labels: HashMap<&str, String> = HashMap::new();

    for (i, triple) in triples.iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 {
            cancel.check()?;
        }
        if classify(triple) != TripleRole::Statement || triple.subject.is_literal() {
            continue;
        }
        let from = interner.intern(&triple.subject);
        if let Term::Literal { value, .. } = &triple.object
            && looks_like_url(value)
        {
            report.url_literals_dropped += 1;
            continue;
        }

        let to = interner.intern(&triple.object);
        if !seen.insert((from, triple.predicate.as_str(), to)) {
            report.duplicate_statements += 1;
            continue;
        }

        let label = predicate_labels
            .entry(triple.predicate.as_str())
            .or_insert_with(|| truncate_label(&local_name(&triple.predicate), label_max_chars))
            .clone();
        let id = EdgeId::synthetic(edges.len() + 1);
        edges.push(Edge::new(id, from, to, label).with_iri(triple.predicate.clone()));
    }
    Ok(edges)
}

fn apply_annotations(
    annotations: HashMap<NodeId, Annotation>,
    interner: &mut TermInterner,
    label_max_chars: usize,
) {
    for (id, annotation) in annotations {
        let Some(node) = interner.node_mut(id) else {
            continue;
        };
        if let Some(label) = annotation.label {
            node.label = truncate_label(&label.value, label_max_chars);
            node.name = label.value;
        }
        if let Some(description) = annotation.description {
            node.props.insert("description".into(), description.value);
        }
        node.props.extend(annotation.props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::RDFS_LABEL;
    use kgv_types::NodeKind;

    const EX: &str = "http://ex.org/";

    fn iri(local: &str) -> Term {
        Term::iri(format!("{EX}{local}"))
    }

    fn pred(local: &str) -> String {
        format!("{EX}{local}")
    }

    fn run(triples: &[Triple]) -> CompiledGraph {
        compile(triples, &ViewConfig::default()).unwrap()
    }

    fn node_by_iri<'a>(graph: &'a Graph, local: &str) -> &'a kgv_types::Node {
        let target = format!("{EX}{local}");
        graph
            .nodes()
            .iter()
            .find(|n| matches!(&n.kind, NodeKind::Iri { iri } if *iri == target))
            .unwrap()
    }

    #[test]
    fn statements_become_edges() {
        let out = run(&[
            Triple::new(iri("a"), pred("knows"), iri("b")),
            Triple::new(iri("a"), pred("age"), Term::literal("30")),
        ]);
        assert_eq!(out.graph.node_count(), 3);
        assert_eq!(out.graph.edge_count(), 2);
        let e1 = &out.graph.edges()[0];
        assert_eq!(e1.id.as_str(), "e_1");
        assert_eq!(e1.label, "knows");
        assert_eq!(e1.iri.as_deref(), Some("http://ex.org/knows"));
        assert_eq!(out.graph.edges()[1].id.as_str(), "e_2");
    }

    #[test]
    fn label_collapses_without_literal_node() {
        let out = run(&[
            Triple::new(iri("a"), RDFS_LABEL, Term::literal("Alice")),
            Triple::new(iri("a"), pred("knows"), iri("b")),
        ]);
        assert_eq!(out.graph.node_count(), 2);
        assert_eq!(out.graph.edge_count(), 1);
        let a = node_by_iri(&out.graph, "a");
        assert_eq!(a.label, "Alice");
        assert_eq!(a.name, "Alice");
        assert_eq!(out.report.collapsed, 1);
    }

    #[test]
    fn english_label_wins_in_either_order() {
        let fr = Triple::new(iri("a"), RDFS_LABEL, Term::lang_literal("Chat", "fr"));
        let en = Triple::new(iri("a"), RDFS_LABEL, Term::lang_literal("Cat", "en"));

        let out = run(&[fr.clone(), en.clone()]);
        assert_eq!(node_by_iri(&out.graph, "a").label, "Cat");
        let out = run(&[en, fr]);
        assert_eq!(node_by_iri(&out.graph, "a").label, "Cat");
    }

    #[test]
    fn last_label_wins_among_equals() {
        let out = run(&[
            Triple::new(iri("a"), RDFS_LABEL, Term::literal("First")),
            Triple::new(iri("a"), "http://schema.org/name", Term::literal("Second")),
        ]);
        assert_eq!(node_by_iri(&out.graph, "a").name, "Second");
    }

    #[test]
    fn label_after_statements_still_applies() {
        let out = run(&[
            Triple::new(iri("a"), pred("knows"), iri("b")),
            Triple::new(iri("b"), RDFS_LABEL, Term::literal("Bob")),
        ]);
        assert_eq!(node_by_iri(&out.graph, "b").label, "Bob");
    }

    #[test]
    fn description_and_exprop_collapse_into_props() {
        let out = run(&[
            Triple::new(
                iri("a"),
                "http://purl.org/dc/terms/description",
                Term::literal("A person"),
            ),
            Triple::new(
                iri("a"),
                "http://example.org/prop/home_town",
                Term::literal("Paris"),
            ),
        ]);
        assert_eq!(out.graph.edge_count(), 0);
        let a = node_by_iri(&out.graph, "a");
        assert_eq!(a.props.get("description").map(String::as_str), Some("A person"));
        assert_eq!(a.props.get("home town").map(String::as_str), Some("Paris"));
    }

    #[test]
    fn url_like_literals_are_dropped() {
        let out = run(&[Triple::new(
            iri("a"),
            pred("homepage"),
            Term::literal("https://alice.example"),
        )]);
        // The subject stays; only the link literal is dropped.
        assert_eq!(out.graph.node_count(), 1);
        assert_eq!(out.graph.nodes()[0].field("iri").as_deref(), Some("http://ex.org/a"));
        assert_eq!(out.graph.edge_count(), 0);
        assert_eq!(out.report.url_literals_dropped, 1);
    }

    #[test]
    fn duplicate_statements_collapse() {
        let t = Triple::new(iri("a"), pred("knows"), iri("b"));
        let out = run(&[t.clone(), t]);
        assert_eq!(out.graph.edge_count(), 1);
        assert_eq!(out.report.duplicate_statements, 1);
    }

    #[test]
    fn shared_literal_is_one_node() {
        let out = run(&[
            Triple::new(iri("a"), pred("city"), Term::literal("Paris")),
            Triple::new(iri("b"), pred("city"), Term::literal("Paris")),
            Triple::new(iri("c"), pred("city"), Term::lang_literal("Paris", "fr")),
        ]);
        let literals = out
            .graph
            .nodes()
            .iter()
            .filter(|n| n.kind.is_literal())
            .count();
        assert_eq!(literals, 2);
        assert_eq!(out.graph.edge_count(), 3);
    }

    #[test]
    fn cancelled_compile_fails() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = compile_with_cancel(
            &[Triple::new(iri("a"), pred("p"), iri("b"))],
            &ViewConfig::default(),
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, kgv_common::KgvError::Cancelled));
    }
}
