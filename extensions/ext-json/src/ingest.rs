//! Loosely-typed JSON documents → canonical graph.
//!
//! Accepted shape: `{ "nodes": [...], "edges": [...] }` or `links` in place
//! of `edges`. Endpoints may be named `from`/`to` or `source`/`target`.

use hashbrown::{HashMap, HashSet};
use kgv_common::{EdgeId, KgvError, KgvResult, NodeId};
use kgv_types::{Edge, Graph, Node, NodeKind, Props};
use serde_json::{Map, Value};
use tracing::{debug, warn};

type Object = Map<String, Value>;

/// Counters describing one JSON ingestion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub nodes: usize,
    pub edges: usize,
    /// Edges whose endpoint did not resolve to a node.
    pub dropped_edges: usize,
    /// Nodes whose supplied id was kept as an external key.
    pub external_keys: usize,
}

#[derive(Clone, Debug)]
pub struct JsonImport {
    pub graph: Graph,
    pub report: IngestReport,
}

/// Parse and normalize a JSON graph document.
pub fn ingest_json(text: &str) -> KgvResult<JsonImport> {
    if text.trim().is_empty() {
        return Err(KgvError::Parse("no text provided".into()));
    }
    let doc: Value =
        serde_json::from_str(text).map_err(|e| KgvError::Parse(format!("invalid JSON: {e}")))?;
    let Value::Object(doc) = doc else {
        return Err(KgvError::Parse(
            "expected an object with `nodes` and `edges`".into(),
        ));
    };
    let raw_nodes = array_field(&doc, &["nodes"])?;
    let raw_edges = array_field(&doc, &["edges", "links"])?;

    let mut report = IngestReport::default();
    let mut graph = Graph::new();
    let mut external: HashMap<String, NodeId> = HashMap::new();

    let ids = assign_node_ids(raw_nodes)?;
    for (i, (raw, (id, external_key))) in raw_nodes.iter().zip(ids).enumerate() {
        let obj = raw
            .as_object()
            .ok_or_else(|| KgvError::Parse(format!("node {i} is not an object")))?;
        if let Some(key) = &external_key {
            report.external_keys += 1;
            if external.insert(key.clone(), id).is_some() {
                return Err(KgvError::DuplicateId(format!("node {key}")));
            }
        }
        graph.add_node(build_node(obj, id, external_key))?;
    }

    let supplied_edge_ids: HashSet<String> = raw_edges
        .iter()
        .filter_map(|e| e.get("id").filter(|v| !v.is_null()).map(scalar_text))
        .collect();

    for (i, raw) in raw_edges.iter().enumerate() {
        let obj = raw
            .as_object()
            .ok_or_else(|| KgvError::Parse(format!("edge {i} is not an object")))?;
        let from = resolve_endpoint(first_of(obj, "from", "source"), &graph, &external);
        let to = resolve_endpoint(first_of(obj, "to", "target"), &graph, &external);
        let (Some(from), Some(to)) = (from, to) else {
            warn!(edge = i, "dropping edge with unresolved endpoint");
            report.dropped_edges += 1;
            continue;
        };
        let id = match obj.get("id").filter(|v| !v.is_null()) {
            Some(v) => EdgeId::new(scalar_text(v)),
            None => synthetic_edge_id(i, &graph, &supplied_edge_ids),
        };
        graph.add_edge(build_edge(obj, id, from, to))?;
    }

    report.nodes = graph.node_count();
    report.edges = graph.edge_count();
    debug!(
        nodes = report.nodes,
        edges = report.edges,
        dropped = report.dropped_edges,
        "json ingested"
    );
    Ok(JsonImport { graph, report })
}

fn array_field<'a>(doc: &'a Object, names: &[&str]) -> KgvResult<&'a [Value]> {
    for name in names {
        match doc.get(*name) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(items)) => return Ok(items),
            Some(_) => return Err(KgvError::Parse(format!("`{name}` must be an array"))),
        }
    }
    Ok(&[])
}

enum RawId {
    Int(i64),
    External(String),
    Missing,
}

/// Resolve every node's id up front so fresh ids can be placed above all
/// numeric ids in the document.
fn assign_node_ids(raw_nodes: &[Value]) -> KgvResult<Vec<(NodeId, Option<String>)>> {
    let raw: Vec<RawId> = raw_nodes
        .iter()
        .map(|n| match n.get("id") {
            None | Some(Value::Null) => RawId::Missing,
            Some(v) => match as_integer(v) {
                Some(n) => RawId::Int(n),
                None => RawId::External(scalar_text(v)),
            },
        })
        .collect();

    let mut supplied = HashSet::new();
    for id in &raw {
        if let RawId::Int(n) = id
            && !supplied.insert(*n)
        {
            return Err(KgvError::DuplicateId(format!("node {n}")));
        }
    }
    let mut fresh = FreshIds {
        last: supplied
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
            .max(raw_nodes.len() as i64),
    };

    raw.into_iter()
        .enumerate()
        .map(|(i, id)| match id {
            RawId::Int(n) => Ok((NodeId(n), None)),
            RawId::External(key) => Ok((fresh.next()?, Some(key))),
            RawId::Missing => {
                let candidate = i as i64 + 1;
                if supplied.contains(&candidate) {
                    Ok((fresh.next()?, None))
                } else {
                    Ok((NodeId(candidate), None))
                }
            }
        })
        .collect()
}

/// Ids above every numeric id in the document, handed out on demand.
struct FreshIds {
    last: i64,
}

impl FreshIds {
    fn next(&mut self) -> KgvResult<NodeId> {
        self.last = self
            .last
            .checked_add(1)
            .ok_or_else(|| KgvError::Parse("node id space exhausted".into()))?;
        Ok(NodeId(self.last))
    }
}

fn build_node(obj: &Object, id: NodeId, external_key: Option<String>) -> Node {
    let kind = restore_kind(obj);
    let key = external_key.or_else(|| text_field(obj, "key"));
    let name = text_field(obj, "name")
        .or_else(|| text_field(obj, "label"))
        .unwrap_or_else(|| format!("Node {}", key.as_deref().unwrap_or(&id.to_string())));
    let label = text_field(obj, "label").unwrap_or_else(|| name.clone());

    let reserved: &[&str] = match kind {
        NodeKind::Iri { .. } => &["type", "iri"],
        NodeKind::BlankNode { .. } => &["type", "bnode"],
        NodeKind::Literal { .. } => &["type", "value", "lang", "datatype"],
        NodeKind::Plain if obj.get("type").and_then(Value::as_str) == Some("Plain") => &["type"],
        NodeKind::Plain => &[],
    };
    let props = collect_props(obj, |k| {
        matches!(k, "id" | "label" | "name" | "key" | "hidden") || reserved.contains(&k)
    });

    Node {
        key,
        props,
        ..Node::new(id, kind, label, name)
    }
}

/// Restore RDF provenance from a KgView export; anything else is `Plain`.
fn restore_kind(obj: &Object) -> NodeKind {
    let ty = obj.get("type").and_then(Value::as_str);
    match ty {
        Some("IRI") => {
            if let Some(iri) = obj.get("iri").and_then(Value::as_str) {
                return NodeKind::Iri { iri: iri.into() };
            }
        }
        Some("BlankNode") => {
            if let Some(bnode) = obj.get("bnode").and_then(Value::as_str) {
                return NodeKind::BlankNode {
                    bnode: bnode.into(),
                };
            }
        }
        Some("Literal") => {
            if let Some(value) = obj.get("value").filter(|v| !v.is_null()) {
                return NodeKind::Literal {
                    value: scalar_text(value),
                    lang: text_field(obj, "lang"),
                    datatype: text_field(obj, "datatype"),
                };
            }
        }
        _ => {}
    }
    NodeKind::Plain
}

fn build_edge(obj: &Object, id: EdgeId, from: NodeId, to: NodeId) -> Edge {
    let label = text_field(obj, "label")
        .or_else(|| text_field(obj, "rel"))
        .unwrap_or_default();
    let props = collect_props(obj, |k| {
        matches!(
            k,
            "id" | "from" | "to" | "source" | "target" | "label" | "rel" | "iri" | "hidden"
        )
    });
    Edge {
        iri: text_field(obj, "iri"),
        props,
        ..Edge::new(id, from, to, label)
    }
}

fn collect_props(obj: &Object, reserved: impl Fn(&str) -> bool) -> Props {
    let mut props = Props::new();
    for (key, value) in obj {
        if reserved(key) || value.is_null() {
            continue;
        }
        if key == "props"
            && let Value::Object(nested) = value
        {
            for (k, v) in nested {
                if !v.is_null() {
                    props.insert(k.as_str().into(), scalar_text(v));
                }
            }
            continue;
        }
        props.insert(key.as_str().into(), scalar_text(value));
    }
    props
}

fn resolve_endpoint(
    value: Option<&Value>,
    graph: &Graph,
    external: &HashMap<String, NodeId>,
) -> Option<NodeId> {
    let value = value?;
    if let Some(n) = as_integer(value)
        && graph.contains_node(NodeId(n))
    {
        return Some(NodeId(n));
    }
    external.get(&scalar_text(value)).copied()
}

fn synthetic_edge_id(index: usize, graph: &Graph, supplied: &HashSet<String>) -> EdgeId {
    let mut n = index;
    loop {
        let id = EdgeId::synthetic(n);
        if !graph.contains_edge(&id) && !supplied.contains(id.as_str()) {
            return id;
        }
        n += 1;
    }
}

fn first_of<'a>(obj: &'a Object, primary: &str, alias: &str) -> Option<&'a Value> {
    obj.get(primary)
        .filter(|v| !v.is_null())
        .or_else(|| obj.get(alias).filter(|v| !v.is_null()))
}

fn text_field(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).filter(|v| !v.is_null()).map(scalar_text)
}

/// Integers, integral floats and strings holding an integer.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strings verbatim; everything else as compact JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
