//! Canonical graph → `{ "nodes": [...], "links": [...] }` JSON.

use kgv_common::{KgvError, KgvResult};
use kgv_types::{Edge, Graph, Node, NodeKind};
use serde_json::{Map, Value, json};

/// Pretty-printed JSON for the whole graph. Visibility is view state and is
/// not written.
pub fn export_json(graph: &Graph) -> KgvResult<String> {
    let nodes: Vec<Value> = graph.nodes().iter().map(node_value).collect();
    let links: Vec<Value> = graph.edges().iter().map(edge_value).collect();
    serde_json::to_string_pretty(&json!({ "nodes": nodes, "links": links }))
        .map_err(|e| KgvError::Export(e.to_string()))
}

fn node_value(node: &Node) -> Value {
    let mut obj = Map::new();
    obj.insert("id".into(), json!(node.id));
    obj.insert("label".into(), json!(node.label));
    obj.insert("name".into(), json!(node.name));
    let ty = node.field("type").map(|t| t.into_owned());
    obj.insert("type".into(), json!(ty));
    match &node.kind {
        NodeKind::Iri { iri } => {
            obj.insert("iri".into(), json!(iri));
        }
        NodeKind::BlankNode { bnode } => {
            obj.insert("bnode".into(), json!(bnode));
        }
        NodeKind::Literal {
            value,
            lang,
            datatype,
        } => {
            obj.insert("value".into(), json!(value));
            if let Some(lang) = lang {
                obj.insert("lang".into(), json!(lang));
            }
            if let Some(dt) = datatype {
                obj.insert("datatype".into(), json!(dt));
            }
        }
        NodeKind::Plain => {}
    }
    if let Some(key) = &node.key {
        obj.insert("key".into(), json!(key));
    }
    flatten_props(&mut obj, node.props.iter());
    Value::Object(obj)
}

fn edge_value(edge: &Edge) -> Value {
    let mut obj = Map::new();
    obj.insert("id".into(), json!(edge.id));
    obj.insert("from".into(), json!(edge.from));
    obj.insert("to".into(), json!(edge.to));
    obj.insert("label".into(), json!(edge.label));
    if let Some(iri) = &edge.iri {
        obj.insert("iri".into(), json!(iri));
    }
    flatten_props(&mut obj, edge.props.iter());
    Value::Object(obj)
}

/// Properties never overwrite core fields already written.
fn flatten_props<'a>(
    obj: &mut Map<String, Value>,
    props: impl Iterator<Item = (&'a smol_str::SmolStr, &'a String)>,
) {
    for (key, value) in props {
        if !obj.contains_key(key.as_str()) {
            obj.insert(key.to_string(), json!(value));
        }
    }
}
