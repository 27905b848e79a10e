//! Structured intents produced by the query parser.

use std::fmt;

use smol_str::SmolStr;

/// Which side of the graph a property query addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Node,
    Edge,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// `<target>:<key>=<value>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyQuery {
    pub target: Target,
    pub key: SmolStr,
    /// Compared case-insensitively; kept as typed for display.
    pub value: String,
}

impl PropertyQuery {
    pub fn new(target: Target, key: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            target,
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PropertyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}={}", self.target, self.key, self.value)
    }
}

/// One parsed command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Clear every filter.
    Reset,
    /// Show the cheat-sheet.
    Help,
    /// Highlight matches; visibility is untouched.
    Search(PropertyQuery),
    /// Add a standing visibility filter.
    Filter(PropertyQuery),
}
