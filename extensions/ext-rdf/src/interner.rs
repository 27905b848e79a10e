//! Term → node id interning, scoped to one ingestion run.

use hashbrown::HashMap;
use kgv_common::NodeId;
use kgv_types::{Node, NodeKind, truncate_label};

use crate::model::{Term, local_name};

/// Identity key of a term. IRIs and blank nodes live in separate key
/// spaces; literals are keyed by `(value, lang, datatype)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum TermKey {
    Iri(String),
    Blank(String),
    Literal(String, Option<String>, Option<String>),
}

impl From<&Term> for TermKey {
    fn from(term: &Term) -> Self {
        match term {
            Term::Iri(iri) => Self::Iri(iri.clone()),
            Term::Blank(id) => Self::Blank(id.clone()),
            Term::Literal {
                value,
                lang,
                datatype,
            } => Self::Literal(value.clone(), lang.clone(), datatype.clone()),
        }
    }
}

/// Assigns dense node ids (starting at 1) to RDF terms and owns the backing
/// node records.
///
/// An interner must never outlive a single compile: ids are only meaningful
/// relative to the nodes it created.
pub struct TermInterner {
    ids: HashMap<TermKey, NodeId>,
    nodes: Vec<Node>,
    label_max_chars: usize,
}

impl TermInterner {
    pub fn new(label_max_chars: usize) -> Self {
        Self {
            ids: HashMap::new(),
            nodes: Vec::new(),
            label_max_chars,
        }
    }

    /// Return the id for `term`, creating its node with a default label on
    /// first sight.
    pub fn intern(&mut self, term: &Term) -> NodeId {
        let key = TermKey::from(term);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as i64 + 1);
        self.nodes.push(self.default_node(id, term));
        self.ids.insert(key, id);
        id
    }

    /// Id of an already-interned term.
    pub fn get(&self, term: &Term) -> Option<NodeId> {
        self.ids.get(&TermKey::from(term)).copied()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let idx = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.nodes.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    fn default_node(&self, id: NodeId, term: &Term) -> Node {
        match term {
            Term::Iri(iri) => {
                let name = local_name(iri);
                let label = truncate_label(&name, self.label_max_chars);
                Node::new(id, NodeKind::Iri { iri: iri.clone() }, label, name)
            }
            Term::Blank(bnode) => {
                let name = format!("_:{bnode}");
                let label = truncate_label(&name, self.label_max_chars);
                Node::new(id, NodeKind::BlankNode { bnode: bnode.clone() }, label, name)
            }
            Term::Literal {
                value,
                lang,
                datatype,
            } => {
                let label = truncate_label(value, self.label_max_chars);
                let kind = NodeKind::Literal {
                    value: value.clone(),
                    lang: lang.clone(),
                    datatype: datatype.clone(),
                };
                Node::new(id, kind, label, value.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_term_same_id() {
        let mut interner = TermInterner::new(64);
        let a = interner.intern(&Term::iri("http://ex.org/a"));
        let b = interner.intern(&Term::iri("http://ex.org/b"));
        assert_eq!(a, NodeId(1));
        assert_eq!(b, NodeId(2));
        assert_eq!(interner.intern(&Term::iri("http://ex.org/a")), a);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn literal_identity_includes_lang_and_datatype() {
        let mut interner = TermInterner::new(64);
        let en = interner.intern(&Term::lang_literal("chat", "en"));
        let fr = interner.intern(&Term::lang_literal("chat", "fr"));
        let plain = interner.intern(&Term::literal("chat"));
        let typed = interner.intern(&Term::typed_literal("chat", "http://ex.org/dt"));
        assert_eq!(
            [en, fr, plain, typed].iter().collect::<hashbrown::HashSet<_>>().len(),
            4
        );
        assert_eq!(interner.intern(&Term::lang_literal("chat", "en")), en);
    }

    #[test]
    fn iri_and_blank_do_not_collide() {
        let mut interner = TermInterner::new(64);
        let iri = interner.intern(&Term::iri("b0"));
        let blank = interner.intern(&Term::blank("b0"));
        assert_ne!(iri, blank);
    }

    #[test]
    fn default_labels() {
        let mut interner = TermInterner::new(10);
        let a = interner.intern(&Term::iri("http://ex.org/people#Alice"));
        let b = interner.intern(&Term::blank("n1"));
        let c = interner.intern(&Term::literal("a rather long literal"));

        let node = interner.node_mut(a).unwrap();
        assert_eq!(node.label, "Alice");
        assert_eq!(node.name, "Alice");
        assert_eq!(interner.node_mut(b).unwrap().label, "_:n1");
        let lit = interner.node_mut(c).unwrap();
        assert_eq!(lit.label, "a rathe…");
        assert_eq!(lit.name, "a rather long literal");
    }

    #[test]
    fn fresh_interner_restarts_ids() {
        let mut first = TermInterner::new(64);
        first.intern(&Term::iri("http://ex.org/x"));
        first.intern(&Term::iri("http://ex.org/y"));
        let mut second = TermInterner::new(64);
        assert_eq!(second.intern(&Term::iri("http://ex.org/y")), NodeId(1));
    }
}
