//! Filter list → `hidden` flags.
//!
//! Each filter contributes a keep-set of nodes and edges; the visible set is
//! the intersection of every keep-set. Visibility is always recomputed from
//! the whole list, never patched incrementally.

use hashbrown::HashSet;
use kgv_common::{EdgeId, NodeId};
use kgv_types::{Graph, GraphStats};
use tracing::debug;

use crate::filter::{Filter, FilterKind, FilterSet};
use crate::matching::eq_ci;

/// Nodes and edges one filter (or an intersection of filters) keeps visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeepSet {
    pub nodes: HashSet<NodeId>,
    pub edges: HashSet<EdgeId>,
}

impl KeepSet {
    /// Keep-set of a single filter.
    ///
    /// Node filters keep the matched nodes, their one-hop neighbors and the
    /// incident edges. Edge filters keep the matched edges and their endpoints.
    pub fn for_filter(graph: &Graph, filter: &Filter) -> Self {
        let mut keep = Self::default();
        match filter.kind {
            FilterKind::NodePropertyEquals => {
                let matched: HashSet<NodeId> = graph
                    .nodes()
                    .iter()
                    .filter(|n| n.field(&filter.key).is_some_and(|v| eq_ci(&v, &filter.value)))
                    .map(|n| n.id)
                    .collect();
                for edge in graph.edges() {
                    if matched.contains(&edge.from) || matched.contains(&edge.to) {
                        keep.edges.insert(edge.id.clone());
                        keep.nodes.insert(edge.from);
                        keep.nodes.insert(edge.to);
                    }
                }
                keep.nodes.extend(matched);
            }
            FilterKind::EdgePropertyEquals => {
                for edge in graph.edges() {
                    if edge
                        .field(&filter.key)
                        .is_some_and(|v| eq_ci(&v, &filter.value))
                    {
                        keep.edges.insert(edge.id.clone());
                        keep.nodes.insert(edge.from);
                        keep.nodes.insert(edge.to);
                    }
                }
            }
        }
        keep
    }

    fn intersect(&mut self, other: &Self) {
        self.nodes.retain(|id| other.nodes.contains(id));
        self.edges.retain(|id| other.edges.contains(id));
    }
}

/// Intersected keep-set of the whole list, or `None` when the list is empty
/// (everything visible).
pub fn compute_keep_set(graph: &Graph, filters: &FilterSet) -> Option<KeepSet> {
    let mut iter = filters.iter();
    let mut keep = KeepSet::for_filter(graph, iter.next()?);
    for filter in iter {
        if keep.nodes.is_empty() && keep.edges.is_empty() {
            break;
        }
        keep.intersect(&KeepSet::for_filter(graph, filter));
    }
    Some(keep)
}

/// Recompute every `hidden` flag from the filter list.
///
/// An edge is visible only if it is kept and both of its endpoints are.
pub fn apply_filters(graph: &mut Graph, filters: &FilterSet) -> GraphStats {
    match compute_keep_set(graph, filters) {
        None => graph.unhide_all(),
        Some(keep) => graph.update_hidden(
            |node| !keep.nodes.contains(&node.id),
            |edge| {
                !(keep.edges.contains(&edge.id)
                    && keep.nodes.contains(&edge.from)
                    && keep.nodes.contains(&edge.to))
            },
        ),
    }
    let stats = graph.stats();
    debug!(
        filters = filters.len(),
        hidden_nodes = stats.hidden_nodes,
        hidden_edges = stats.hidden_edges,
        "visibility recomputed"
    );
    stats
}
