//! Downstream view abstraction fed by imports and visibility changes.

use indexmap::IndexMap;
use kgv_common::{EdgeId, KgvError, KgvResult, NodeId};
use kgv_types::{Edge, Node};

/// A live view that mirrors the canonical graph.
///
/// Imports call `clear`, then `upsert_nodes` for every node chunk, then
/// `upsert_edges` for every edge chunk, then `import_finished` exactly once.
pub trait ViewSink {
    fn clear(&mut self) -> KgvResult<()>;

    /// Insert or replace nodes by id.
    fn upsert_nodes(&mut self, nodes: &[Node]) -> KgvResult<()>;

    /// Insert or replace edges by id. Endpoints must already be present.
    fn upsert_edges(&mut self, edges: &[Edge]) -> KgvResult<()>;

    fn remove_nodes(&mut self, ids: &[NodeId]) -> KgvResult<()>;

    fn remove_edges(&mut self, ids: &[EdgeId]) -> KgvResult<()>;

    /// The single completion signal of an import.
    fn import_finished(&mut self) -> KgvResult<()>;
}

/// In-memory [`ViewSink`] that enforces referential integrity.
#[derive(Debug, Default)]
pub struct MemoryView {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    node_batches: usize,
    edge_batches: usize,
    finished: usize,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of `upsert_nodes` / `upsert_edges` calls since the last clear.
    pub fn batches(&self) -> (usize, usize) {
        (self.node_batches, self.edge_batches)
    }

    /// Completion signals received over the view's lifetime.
    pub fn finished_count(&self) -> usize {
        self.finished
    }
}

impl ViewSink for MemoryView {
    fn clear(&mut self) -> KgvResult<()> {
        self.nodes.clear();
        self.edges.clear();
        self.node_batches = 0;
        self.edge_batches = 0;
        Ok(())
    }

    fn upsert_nodes(&mut self, nodes: &[Node]) -> KgvResult<()> {
        for node in nodes {
            self.nodes.insert(node.id, node.clone());
        }
        self.node_batches += 1;
        Ok(())
    }

    fn upsert_edges(&mut self, edges: &[Edge]) -> KgvResult<()> {
        // Validate the whole chunk first so a bad edge leaves the view untouched.
        for edge in edges {
            for endpoint in [edge.from, edge.to] {
                if !self.nodes.contains_key(&endpoint) {
                    return Err(KgvError::ReferentialIntegrity(format!(
                        "edge {} references missing node {endpoint}",
                        edge.id
                    )));
                }
            }
        }
        for edge in edges {
            self.edges.insert(edge.id.clone(), edge.clone());
        }
        self.edge_batches += 1;
        Ok(())
    }

    fn remove_nodes(&mut self, ids: &[NodeId]) -> KgvResult<()> {
        for id in ids {
            self.nodes.shift_remove(id);
        }
        self.edges
            .retain(|_, e| !ids.contains(&e.from) && !ids.contains(&e.to));
        Ok(())
    }

    fn remove_edges(&mut self, ids: &[EdgeId]) -> KgvResult<()> {
        for id in ids {
            self.edges.shift_remove(id);
        }
        Ok(())
    }

    fn import_finished(&mut self) -> KgvResult<()> {
        self.finished += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dangling_edges() {
        let mut view = MemoryView::new();
        view.upsert_nodes(&[Node::plain(NodeId(1), "a")]).unwrap();
        let err = view
            .upsert_edges(&[
                Edge::new(EdgeId::synthetic(1), NodeId(1), NodeId(1), "self"),
                Edge::new(EdgeId::synthetic(2), NodeId(1), NodeId(2), "dangling"),
            ])
            .unwrap_err();
        assert!(matches!(err, KgvError::ReferentialIntegrity(_)));
        assert_eq!(view.edge_count(), 0);
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut view = MemoryView::new();
        view.upsert_nodes(&[Node::plain(NodeId(1), "a")]).unwrap();
        view.upsert_nodes(&[Node::plain(NodeId(1), "b")]).unwrap();
        assert_eq!(view.node_count(), 1);
        assert_eq!(view.node(NodeId(1)).unwrap().label, "b");
    }

    #[test]
    fn removing_node_drops_its_edges() {
        let mut view = MemoryView::new();
        view.upsert_nodes(&[Node::plain(NodeId(1), "a"), Node::plain(NodeId(2), "b")])
            .unwrap();
        view.upsert_edges(&[Edge::new(EdgeId::synthetic(1), NodeId(1), NodeId(2), "r")])
            .unwrap();
        view.remove_nodes(&[NodeId(2)]).unwrap();
        assert_eq!(view.node_count(), 1);
        assert_eq!(view.edge_count(), 0);
    }
}
