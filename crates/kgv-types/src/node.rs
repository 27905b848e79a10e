use std::borrow::Cow;

use kgv_common::NodeId;

use crate::props::Props;

/// Provenance payload of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Named RDF resource.
    Iri { iri: String },
    /// RDF blank node, keyed by its document-scoped label.
    BlankNode { bnode: String },
    /// RDF literal value with optional language tag and datatype IRI.
    Literal {
        value: String,
        lang: Option<String>,
        datatype: Option<String>,
    },
    /// JSON-sourced node without RDF provenance.
    Plain,
}

impl NodeKind {
    /// The `type` name exposed to queries and exports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Iri { .. } => "IRI",
            Self::BlankNode { .. } => "BlankNode",
            Self::Literal { .. } => "Literal",
            Self::Plain => "Plain",
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }
}

/// A graph vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Short display label (possibly truncated).
    pub label: String,
    /// Full display name.
    pub name: String,
    /// External key from the source document when it was not an integer.
    pub key: Option<String>,
    pub props: Props,
    /// Derived by the filter engine; never authoritative.
    pub hidden: bool,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            name: name.into(),
            key: None,
            props: Props::new(),
            hidden: false,
        }
    }

    /// A JSON-style node whose label and name are the same string.
    pub fn plain(id: NodeId, label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(id, NodeKind::Plain, label.clone(), label)
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Look up a queryable field by name.
    ///
    /// Core record fields take precedence over the property bag. Fields that
    /// do not apply to this node's kind are absent, not empty.
    pub fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "id" => return Some(Cow::Owned(self.id.to_string())),
            "label" => return Some(Cow::Borrowed(&self.label)),
            "name" => return Some(Cow::Borrowed(&self.name)),
            "kind" => return Some(Cow::Borrowed(self.kind.type_name())),
            "type" => {
                // JSON documents often carry their own `type` on plain nodes.
                let own = match self.kind {
                    NodeKind::Plain => self.props.get("type").map(String::as_str),
                    _ => None,
                };
                return Some(Cow::Borrowed(own.unwrap_or(self.kind.type_name())));
            }
            _ => {}
        }
        let core = match (&self.kind, key) {
            (NodeKind::Iri { iri }, "iri") => Some(iri.as_str()),
            (NodeKind::BlankNode { bnode }, "bnode") => Some(bnode.as_str()),
            (NodeKind::Literal { value, .. }, "value") => Some(value.as_str()),
            (NodeKind::Literal { lang, .. }, "lang") => lang.as_deref(),
            (NodeKind::Literal { datatype, .. }, "datatype") => datatype.as_deref(),
            (_, "key") => self.key.as_deref(),
            _ => None,
        };
        core.or_else(|| self.props.get(key).map(String::as_str))
            .map(Cow::Borrowed)
    }
}
