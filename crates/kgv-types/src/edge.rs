use std::borrow::Cow;

use kgv_common::{EdgeId, NodeId};

use crate::props::Props;

/// A directed relationship between two existing nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Predicate IRI the edge was compiled from, if any.
    pub iri: Option<String>,
    pub label: String,
    pub props: Props,
    /// Derived by the filter engine; never authoritative.
    pub hidden: bool,
}

impl Edge {
    pub fn new(id: EdgeId, from: NodeId, to: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            from,
            to,
            iri: None,
            label: label.into(),
            props: Props::new(),
            hidden: false,
        }
    }

    pub fn with_iri(mut self, iri: impl Into<String>) -> Self {
        self.iri = Some(iri.into());
        self
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    /// Look up a queryable field by name; core fields shadow the property bag.
    pub fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "id" => Some(Cow::Borrowed(self.id.as_str())),
            "from" => Some(Cow::Owned(self.from.to_string())),
            "to" => Some(Cow::Owned(self.to.to_string())),
            "label" => Some(Cow::Borrowed(&self.label)),
            "iri" => self.iri.as_deref().map(Cow::Borrowed),
            _ => self.props.get(key).map(|v| Cow::Borrowed(v.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields() {
        let edge = Edge::new(EdgeId::new("e_1"), NodeId(1), NodeId(2), "KNOWS")
            .with_prop("since", "2020");
        assert_eq!(edge.field("id").as_deref(), Some("e_1"));
        assert_eq!(edge.field("from").as_deref(), Some("1"));
        assert_eq!(edge.field("to").as_deref(), Some("2"));
        assert_eq!(edge.field("label").as_deref(), Some("KNOWS"));
        assert_eq!(edge.field("since").as_deref(), Some("2020"));
        assert_eq!(edge.field("iri"), None);
    }

    #[test]
    fn touches_both_endpoints() {
        let edge = Edge::new(EdgeId::new("e"), NodeId(1), NodeId(2), "");
        assert!(edge.touches(NodeId(1)));
        assert!(edge.touches(NodeId(2)));
        assert!(!edge.touches(NodeId(3)));
    }
}
