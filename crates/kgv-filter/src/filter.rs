use std::fmt;

use kgv_common::FilterId;
use kgv_parser::{PropertyQuery, Target};
use smol_str::SmolStr;

/// What a standing filter compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    NodePropertyEquals,
    EdgePropertyEquals,
}

impl From<Target> for FilterKind {
    fn from(target: Target) -> Self {
        match target {
            Target::Node => Self::NodePropertyEquals,
            Target::Edge => Self::EdgePropertyEquals,
        }
    }
}

/// A standing visibility filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub id: FilterId,
    pub kind: FilterKind,
    pub key: SmolStr,
    pub value: String,
}

impl Filter {
    /// Display label: `node: key=value` or `edge: key=value`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.kind {
            FilterKind::NodePropertyEquals => "node",
            FilterKind::EdgePropertyEquals => "edge",
        };
        write!(f, "{side}: {}={}", self.key, self.value)
    }
}

/// Ordered list of standing filters with monotonically assigned ids.
///
/// Ids are never reused, not even after `clear`.
#[derive(Clone, Debug, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
    next_id: u64,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter and return its id.
    pub fn push(&mut self, kind: FilterKind, key: impl Into<SmolStr>, value: impl Into<String>) -> FilterId {
        self.next_id += 1;
        let id = FilterId(self.next_id);
        self.filters.push(Filter {
            id,
            kind,
            key: key.into(),
            value: value.into(),
        });
        id
    }

    pub fn push_query(&mut self, query: &PropertyQuery) -> FilterId {
        self.push(query.target.into(), query.key.clone(), query.value.clone())
    }

    pub fn remove(&mut self, id: FilterId) -> Option<Filter> {
        let idx = self.filters.iter().position(|f| f.id == id)?;
        Some(self.filters.remove(idx))
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn get(&self, id: FilterId) -> Option<&Filter> {
        self.filters.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut set = FilterSet::new();
        let a = set.push(FilterKind::NodePropertyEquals, "type", "Person");
        let b = set.push(FilterKind::EdgePropertyEquals, "label", "knows");
        assert!(b > a);
        set.clear();
        let c = set.push(FilterKind::NodePropertyEquals, "type", "Person");
        assert!(c > b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_keeps_order() {
        let mut set = FilterSet::new();
        let a = set.push(FilterKind::NodePropertyEquals, "a", "1");
        let b = set.push(FilterKind::NodePropertyEquals, "b", "2");
        let c = set.push(FilterKind::NodePropertyEquals, "c", "3");
        assert_eq!(set.remove(b).map(|f| f.id), Some(b));
        assert_eq!(set.remove(b), None);
        let ids: Vec<_> = set.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn labels() {
        let mut set = FilterSet::new();
        let query = PropertyQuery::new(Target::Edge, "label", "KNOWS");
        let id = set.push_query(&query);
        assert_eq!(set.get(id).unwrap().label(), "edge: label=KNOWS");
        let id = set.push(FilterKind::NodePropertyEquals, "name", "Alice");
        assert_eq!(set.get(id).unwrap().label(), "node: name=Alice");
    }
}
