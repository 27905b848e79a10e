use kgv_common::{EdgeId, FilterId, KgvError, NodeId};
use kgv_batch::ImportPhase;
use kgv_filter::Suggestion;
use kgv_ingest::IngestStage;
use kgv_parser::PropertyQuery;

/// Size of an installed import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportSummary {
    pub nodes: usize,
    pub edges: usize,
    /// Whether the import was applied in chunks.
    pub batched: bool,
}

/// What one `Session::poll` did.
#[derive(Debug)]
pub enum SessionEvent {
    /// Nothing new happened.
    Idle,
    Progress(IngestStage),
    ImportChunk { phase: ImportPhase, applied: usize },
    Imported(ImportSummary),
    /// The pending ingestion failed; the previous graph is still installed.
    Failed(KgvError),
}

/// Result of running one query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryOutcome {
    Reset,
    Help(&'static str),
    NodeMatches(Vec<NodeId>),
    EdgeMatches(Vec<EdgeId>),
    FilterAdded {
        id: FilterId,
        label: String,
    },
    /// No exact match; `filter` tells whether a filter was requested (and
    /// therefore not added).
    Suggestions {
        query: PropertyQuery,
        filter: bool,
        suggestions: Vec<Suggestion>,
    },
    NoResults {
        query: PropertyQuery,
    },
}
