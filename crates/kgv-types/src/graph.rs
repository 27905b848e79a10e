use hashbrown::HashMap;
use kgv_common::{EdgeId, KgvError, KgvResult, NodeId};

use crate::edge::Edge;
use crate::node::Node;
use crate::props::{Props, truncate_label};

/// The canonical graph: nodes, edges, and id → position indexes.
///
/// Every edge endpoint references an existing node and ids are unique; the
/// constructors and mutators enforce both before changing anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<NodeId, usize>,
    edge_index: HashMap<EdgeId, usize>,
}

/// Counts for status lines and import reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub hidden_nodes: usize,
    pub hidden_edges: usize,
    pub literal_nodes: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from bulk node/edge lists, validating id uniqueness
    /// and endpoint existence.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> KgvResult<Self> {
        let mut graph = Self {
            node_index: HashMap::with_capacity(nodes.len()),
            edge_index: HashMap::with_capacity(edges.len()),
            nodes: Vec::with_capacity(nodes.len()),
            edges: Vec::with_capacity(edges.len()),
        };
        for node in nodes {
            graph.add_node(node)?;
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edge_index.get(id).map(|&idx| &self.edges[idx])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Largest node id in the graph, if any.
    pub fn max_node_id(&self) -> Option<NodeId> {
        self.node_index.keys().copied().max()
    }

    pub fn add_node(&mut self, node: Node) -> KgvResult<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(KgvError::DuplicateId(format!("node {}", node.id)));
        }
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn add_edge(&mut self, edge: Edge) -> KgvResult<()> {
        if self.edge_index.contains_key(&edge.id) {
            return Err(KgvError::DuplicateId(format!("edge {}", edge.id)));
        }
        for endpoint in [edge.from, edge.to] {
            if !self.node_index.contains_key(&endpoint) {
                return Err(KgvError::ReferentialIntegrity(format!(
                    "edge {} references missing node {endpoint}",
                    edge.id
                )));
            }
        }
        self.edge_index.insert(edge.id.clone(), self.edges.len());
        self.edges.push(edge);
        Ok(())
    }

    /// Remove a node together with every incident edge.
    pub fn remove_node(&mut self, id: NodeId) -> Option<(Node, Vec<Edge>)> {
        let idx = self.node_index.get(&id).copied()?;
        let node = self.nodes.remove(idx);
        let (removed, kept): (Vec<Edge>, Vec<Edge>) =
            std::mem::take(&mut self.edges).into_iter().partition(|e| e.touches(id));
        self.edges = kept;
        self.reindex();
        Some((node, removed))
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let idx = self.edge_index.get(id).copied()?;
        let edge = self.edges.remove(idx);
        self.reindex_edges();
        Some(edge)
    }

    pub fn node_props_mut(&mut self, id: NodeId) -> Option<&mut Props> {
        let idx = self.node_index.get(&id).copied()?;
        Some(&mut self.nodes[idx].props)
    }

    /// Rename a node: `name` keeps the full text, `label` is truncated to
    /// `max_chars`.
    pub fn set_node_label(
        &mut self,
        id: NodeId,
        label: impl Into<String>,
        max_chars: usize,
    ) -> bool {
        match self.node_index.get(&id).copied() {
            Some(idx) => {
                let name = label.into();
                self.nodes[idx].label = truncate_label(&name, max_chars);
                self.nodes[idx].name = name;
                true
            }
            None => false,
        }
    }

    /// Overwrite every derived `hidden` flag in one pass.
    pub fn update_hidden(
        &mut self,
        mut node_hidden: impl FnMut(&Node) -> bool,
        mut edge_hidden: impl FnMut(&Edge) -> bool,
    ) {
        for node in &mut self.nodes {
            node.hidden = node_hidden(node);
        }
        for edge in &mut self.edges {
            edge.hidden = edge_hidden(edge);
        }
    }

    /// Clear every derived `hidden` flag.
    pub fn unhide_all(&mut self) {
        self.update_hidden(|_| false, |_| false);
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.hidden)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| !e.hidden)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            hidden_nodes: self.nodes.iter().filter(|n| n.hidden).count(),
            hidden_edges: self.edges.iter().filter(|e| e.hidden).count(),
            literal_nodes: self.nodes.iter().filter(|n| n.kind.is_literal()).count(),
        }
    }

    fn reindex(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.id, idx))
            .collect();
        self.reindex_edges();
    }

    fn reindex_edges(&mut self) {
        self.edge_index = self
            .edges
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.id.clone(), idx))
            .collect();
    }
}
