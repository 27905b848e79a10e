//! Property search: exact match first, grouped substring suggestions second.

use std::borrow::Cow;

use indexmap::IndexMap;
use kgv_common::{EdgeId, NodeId};
use kgv_parser::{PropertyQuery, Target};
use kgv_types::Graph;

use crate::matching::{contains_ci, eq_ci};

/// Ids of matching entities, in graph order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hits {
    Nodes(Vec<NodeId>),
    Edges(Vec<EdgeId>),
}

impl Hits {
    pub fn len(&self) -> usize {
        match self {
            Self::Nodes(ids) => ids.len(),
            Self::Edges(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One distinct field value that contains the searched text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub value: String,
    pub count: usize,
    pub hits: Hits,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At least one exact (case-insensitive) match.
    Matches(Hits),
    /// No exact match; values containing the text, most frequent first.
    Suggestions(Vec<Suggestion>),
    NoResults,
}

/// Search every node or edge, hidden ones included.
///
/// Entities without the field never match. Suggestions are grouped by the
/// field's exact value, ranked by count (ties keep first-seen order) and
/// capped at `limit`.
pub fn search(graph: &Graph, query: &PropertyQuery, limit: usize) -> SearchOutcome {
    let key = query.key.as_str();
    match query.target {
        Target::Node => {
            let entries = graph
                .nodes()
                .iter()
                .filter_map(|n| n.field(key).map(|v| (v, n.id)));
            find(entries, &query.value, limit, Hits::Nodes)
        }
        Target::Edge => {
            let entries = graph
                .edges()
                .iter()
                .filter_map(|e| e.field(key).map(|v| (v, e.id.clone())));
            find(entries, &query.value, limit, Hits::Edges)
        }
    }
}

fn find<'g, I: Clone>(
    entries: impl Iterator<Item = (Cow<'g, str>, I)>,
    value: &str,
    limit: usize,
    wrap: fn(Vec<I>) -> Hits,
) -> SearchOutcome {
    let entries: Vec<_> = entries.collect();

    let exact: Vec<I> = entries
        .iter()
        .filter(|(v, _)| eq_ci(v, value))
        .map(|(_, id)| id.clone())
        .collect();
    if !exact.is_empty() {
        return SearchOutcome::Matches(wrap(exact));
    }

    let mut groups: IndexMap<String, Vec<I>> = IndexMap::new();
    for (v, id) in entries {
        if contains_ci(&v, value) {
            groups.entry(v.into_owned()).or_default().push(id);
        }
    }
    if groups.is_empty() {
        return SearchOutcome::NoResults;
    }

    let mut groups: Vec<(String, Vec<I>)> = groups.into_iter().collect();
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    groups.truncate(limit);
    SearchOutcome::Suggestions(
        groups
            .into_iter()
            .map(|(value, ids)| Suggestion {
                value,
                count: ids.len(),
                hits: wrap(ids),
            })
            .collect(),
    )
}
