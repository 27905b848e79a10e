//! Step-wise application of a freshly ingested graph to a [`ViewSink`].
//!
//! Small graphs are applied in one step. Graphs at or above the configured
//! threshold are applied in node chunks, then edge chunks, one chunk per
//! [`BatchImport::step`], so the caller regains control between chunks.

use kgv_common::{KgvError, KgvResult, ViewConfig};
use kgv_types::Graph;
use tracing::debug;

use crate::sink::ViewSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportMode {
    Single,
    Chunked { node_chunk: usize, edge_chunk: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportPhase {
    Nodes,
    Edges,
}

#[derive(Debug)]
pub enum ImportStep {
    /// One chunk was applied; call `step` again.
    Yielded { phase: ImportPhase, applied: usize },
    /// Everything is applied and the sink was signalled.
    Complete(Graph),
}

pub struct BatchImport {
    graph: Option<Graph>,
    mode: ImportMode,
    started: bool,
    nodes_applied: usize,
    edges_applied: usize,
}

impl BatchImport {
    pub fn new(graph: Graph, config: &ViewConfig) -> Self {
        let total = graph.node_count() + graph.edge_count();
        let mode = if total >= config.big_import_threshold {
            ImportMode::Chunked {
                node_chunk: config.node_chunk(),
                edge_chunk: config.edge_chunk(),
            }
        } else {
            ImportMode::Single
        };
        debug!(total, ?mode, "import planned");
        Self {
            graph: Some(graph),
            mode,
            started: false,
            nodes_applied: 0,
            edges_applied: 0,
        }
    }

    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    pub fn is_batched(&self) -> bool {
        matches!(self.mode, ImportMode::Chunked { .. })
    }

    /// `(nodes_applied, edges_applied)` so far.
    pub fn progress(&self) -> (usize, usize) {
        (self.nodes_applied, self.edges_applied)
    }

    /// Apply the next chunk. The first step clears the sink.
    pub fn step(&mut self, sink: &mut dyn ViewSink) -> KgvResult<ImportStep> {
        let Some(graph) = self.graph.as_ref() else {
            return Err(KgvError::Import("import already complete".into()));
        };
        if !self.started {
            sink.clear()?;
            self.started = true;
        }

        let (phase, applied) = match self.mode {
            ImportMode::Single => {
                sink.upsert_nodes(graph.nodes())?;
                sink.upsert_edges(graph.edges())?;
                self.nodes_applied = graph.node_count();
                self.edges_applied = graph.edge_count();
                (ImportPhase::Edges, graph.node_count() + graph.edge_count())
            }
            ImportMode::Chunked {
                node_chunk,
                edge_chunk,
            } => {
                if self.nodes_applied < graph.node_count() {
                    let end = (self.nodes_applied + node_chunk).min(graph.node_count());
                    sink.upsert_nodes(&graph.nodes()[self.nodes_applied..end])?;
                    let applied = end - self.nodes_applied;
                    self.nodes_applied = end;
                    (ImportPhase::Nodes, applied)
                } else {
                    let end = (self.edges_applied + edge_chunk).min(graph.edge_count());
                    sink.upsert_edges(&graph.edges()[self.edges_applied..end])?;
                    let applied = end - self.edges_applied;
                    self.edges_applied = end;
                    (ImportPhase::Edges, applied)
                }
            }
        };
        debug!(?phase, applied, "import chunk applied");

        if self.nodes_applied < graph.node_count() || self.edges_applied < graph.edge_count() {
            return Ok(ImportStep::Yielded { phase, applied });
        }
        sink.import_finished()?;
        match self.graph.take() {
            Some(graph) => Ok(ImportStep::Complete(graph)),
            None => Err(KgvError::Import("import already complete".into())),
        }
    }

    /// Drive every remaining step on the calling thread.
    pub fn run_to_completion(mut self, sink: &mut dyn ViewSink) -> KgvResult<Graph> {
        loop {
            if let ImportStep::Complete(graph) = self.step(sink)? {
                return Ok(graph);
            }
        }
    }
}
