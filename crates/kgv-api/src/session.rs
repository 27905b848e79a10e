//! The consumer of ingestion results: owns the canonical graph, the filter
//! list and the live view.

use std::mem;

use ext_rdf::RdfFormat;
use kgv_batch::{BatchImport, ImportStep, RecomputeFlags, ViewSink};
use kgv_common::{CancelToken, EdgeId, FilterId, KgvError, KgvResult, NodeId, ViewConfig};
use kgv_filter::{Filter, FilterSet, Hits, SearchOutcome, apply_filters, search};
use kgv_ingest::{IngestHandle, IngestRequest, IngestWorker, SourceFormat, WorkerMessage};
use kgv_parser::{Intent, PropertyQuery};
use kgv_types::{Edge, Graph, GraphStats, Node};
use tracing::{debug, info, warn};

use crate::help::HELP_TEXT;
use crate::outcome::{ImportSummary, QueryOutcome, SessionEvent};

enum IngestState {
    Idle,
    Ingesting(IngestHandle),
    Importing(BatchImport),
}

pub struct Session<S: ViewSink> {
    config: ViewConfig,
    graph: Graph,
    filters: FilterSet,
    sink: S,
    flags: RecomputeFlags,
    state: IngestState,
}

impl<S: ViewSink> Session<S> {
    pub fn new(config: ViewConfig, sink: S) -> Self {
        Self {
            config,
            graph: Graph::new(),
            filters: FilterSet::new(),
            sink,
            flags: RecomputeFlags::default(),
            state: IngestState::Idle,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn flags(&self) -> RecomputeFlags {
        self.flags
    }

    /// An ingestion or import is in flight.
    pub fn is_busy(&self) -> bool {
        !matches!(self.state, IngestState::Idle)
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    // ---- ingestion ----

    /// Start ingesting on a worker thread. Any pending ingestion or import
    /// is abandoned. Drive progress with [`Session::poll`].
    pub fn start_ingest(&mut self, text: impl Into<String>, format: SourceFormat) -> KgvResult<()> {
        self.abandon_pending();
        self.flags.raise();
        let request = IngestRequest {
            text: text.into(),
            format,
            config: self.config.clone(),
        };
        match IngestWorker::spawn(request) {
            Ok(handle) => {
                debug!(%format, "ingest started");
                self.state = IngestState::Ingesting(handle);
                Ok(())
            }
            Err(e) => {
                self.settle(false);
                Err(e)
            }
        }
    }

    /// Advance the pending ingestion by at most one message or one chunk.
    pub fn poll(&mut self) -> SessionEvent {
        match mem::replace(&mut self.state, IngestState::Idle) {
            IngestState::Idle => SessionEvent::Idle,
            IngestState::Ingesting(mut handle) => match handle.try_recv() {
                None => {
                    self.state = IngestState::Ingesting(handle);
                    SessionEvent::Idle
                }
                Some(WorkerMessage::Progress(stage)) => {
                    self.state = IngestState::Ingesting(handle);
                    SessionEvent::Progress(stage)
                }
                Some(WorkerMessage::Done(output)) => {
                    self.step_import(BatchImport::new(output.graph, &self.config))
                }
                Some(WorkerMessage::Error(e)) => self.fail(e),
            },
            IngestState::Importing(import) => self.step_import(import),
        }
    }

    /// Ingest and install on the calling thread.
    pub fn ingest_blocking(&mut self, text: &str, format: SourceFormat) -> KgvResult<ImportSummary> {
        self.abandon_pending();
        self.flags.raise();
        let output = match kgv_ingest::ingest(text, format, &self.config, &CancelToken::new()) {
            Ok(output) => output,
            Err(e) => {
                self.settle(false);
                return Err(e);
            }
        };
        let import = BatchImport::new(output.graph, &self.config);
        let batched = import.is_batched();
        match import.run_to_completion(&mut self.sink) {
            Ok(graph) => Ok(self.install(graph, batched)),
            Err(e) => {
                self.settle(true);
                Err(e)
            }
        }
    }

    fn abandon_pending(&mut self) {
        match mem::replace(&mut self.state, IngestState::Idle) {
            IngestState::Idle => {}
            IngestState::Ingesting(handle) => {
                warn!("superseding pending ingestion");
                handle.cancel();
                self.settle(false);
            }
            IngestState::Importing(_) => {
                warn!("superseding unfinished import");
                self.settle(true);
            }
        }
    }

    fn step_import(&mut self, mut import: BatchImport) -> SessionEvent {
        let batched = import.is_batched();
        match import.step(&mut self.sink) {
            Ok(ImportStep::Yielded { phase, applied }) => {
                self.state = IngestState::Importing(import);
                SessionEvent::ImportChunk { phase, applied }
            }
            Ok(ImportStep::Complete(graph)) => {
                SessionEvent::Imported(self.install(graph, batched))
            }
            Err(e) => {
                self.state = IngestState::Idle;
                warn!(error = %e, "import failed");
                self.settle(true);
                SessionEvent::Failed(e)
            }
        }
    }

    fn fail(&mut self, error: KgvError) -> SessionEvent {
        warn!(error = %error, "ingestion failed");
        self.state = IngestState::Idle;
        self.settle(false);
        SessionEvent::Failed(error)
    }

    /// Lower the flags after an aborted ingestion and bring visibility up to
    /// date with the filter list, which may have changed while suspended.
    /// `rebuild` also replaces a partially imported view.
    fn settle(&mut self, rebuild: bool) {
        self.flags.lower();
        let result = if rebuild {
            self.resync_view()
        } else {
            self.recompute()
        };
        if let Err(e) = result {
            warn!(error = %e, "view resync failed");
        }
    }

    /// Swap in a fully imported graph: filters reset, flags lowered,
    /// visibility recomputed once.
    fn install(&mut self, graph: Graph, batched: bool) -> ImportSummary {
        self.graph = graph;
        self.filters.clear();
        self.flags.lower();
        // The chunks already carried every element; only the flags need
        // recomputing here.
        apply_filters(&mut self.graph, &self.filters);
        let summary = ImportSummary {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            batched,
        };
        info!(
            nodes = summary.nodes,
            edges = summary.edges,
            batched,
            "graph installed"
        );
        summary
    }

    /// Rebuild the view from the canonical graph after an aborted import.
    fn resync_view(&mut self) -> KgvResult<()> {
        apply_filters(&mut self.graph, &self.filters);
        self.sink.clear()?;
        self.sink.upsert_nodes(self.graph.nodes())?;
        self.sink.upsert_edges(self.graph.edges())
    }

    /// Recompute visibility from the whole filter list and push it to the view.
    fn recompute(&mut self) -> KgvResult<()> {
        if self.flags.suspend_recompute {
            return Ok(());
        }
        apply_filters(&mut self.graph, &self.filters);
        if !self.flags.skip_view_sync {
            self.sink.upsert_nodes(self.graph.nodes())?;
            self.sink.upsert_edges(self.graph.edges())?;
        }
        Ok(())
    }

    // ---- queries ----

    /// Parse and run one query line.
    pub fn run(&mut self, query: &str) -> KgvResult<QueryOutcome> {
        let intent =
            kgv_parser::parse(query).map_err(|e| KgvError::QuerySyntax(e.to_string()))?;
        self.run_intent(intent)
    }

    pub fn run_intent(&mut self, intent: Intent) -> KgvResult<QueryOutcome> {
        match intent {
            Intent::Reset => {
                self.filters.clear();
                self.recompute()?;
                Ok(QueryOutcome::Reset)
            }
            Intent::Help => Ok(QueryOutcome::Help(HELP_TEXT)),
            Intent::Search(query) => Ok(self.search_outcome(query, false)),
            Intent::Filter(query) => {
                let limit = self.config.suggestion_limit;
                if !matches!(search(&self.graph, &query, limit), SearchOutcome::Matches(_)) {
                    return Ok(self.search_outcome(query, true));
                }
                let id = self.filters.push_query(&query);
                self.recompute()?;
                let label = self
                    .filters
                    .get(id)
                    .map(Filter::label)
                    .unwrap_or_else(|| query.to_string());
                Ok(QueryOutcome::FilterAdded { id, label })
            }
        }
    }

    fn search_outcome(&self, query: PropertyQuery, filter: bool) -> QueryOutcome {
        match search(&self.graph, &query, self.config.suggestion_limit) {
            SearchOutcome::Matches(Hits::Nodes(ids)) => QueryOutcome::NodeMatches(ids),
            SearchOutcome::Matches(Hits::Edges(ids)) => QueryOutcome::EdgeMatches(ids),
            SearchOutcome::Suggestions(suggestions) => QueryOutcome::Suggestions {
                query,
                filter,
                suggestions,
            },
            SearchOutcome::NoResults => QueryOutcome::NoResults { query },
        }
    }

    /// Remove one standing filter.
    pub fn remove_filter(&mut self, id: FilterId) -> KgvResult<Filter> {
        let filter = self
            .filters
            .remove(id)
            .ok_or_else(|| KgvError::QuerySyntax(format!("no filter {id}")))?;
        self.recompute()?;
        Ok(filter)
    }

    // ---- user edits ----

    /// Smallest id above every existing node id.
    pub fn next_node_id(&self) -> KgvResult<NodeId> {
        match self.graph.max_node_id() {
            None => Ok(NodeId(1)),
            Some(NodeId(max)) => max
                .checked_add(1)
                .map(NodeId)
                .ok_or_else(|| KgvError::DuplicateId("node id space exhausted".into())),
        }
    }

    pub fn add_node(&mut self, node: Node) -> KgvResult<()> {
        self.graph.add_node(node)?;
        self.recompute()
    }

    /// Rejected before mutation when an endpoint does not exist.
    pub fn add_edge(&mut self, edge: Edge) -> KgvResult<()> {
        self.graph.add_edge(edge)?;
        self.recompute()
    }

    pub fn update_node_props<K, V>(
        &mut self,
        id: NodeId,
        props: impl IntoIterator<Item = (K, V)>,
    ) -> KgvResult<()>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let bag = self
            .graph
            .node_props_mut(id)
            .ok_or_else(|| missing_node(id))?;
        for (key, value) in props {
            bag.insert(key.as_ref().into(), value.into());
        }
        self.recompute()
    }

    pub fn rename_node(&mut self, id: NodeId, label: &str) -> KgvResult<()> {
        if !self
            .graph
            .set_node_label(id, label, self.config.label_max_chars)
        {
            return Err(missing_node(id));
        }
        self.recompute()
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> KgvResult<(Node, Vec<Edge>)> {
        let (node, edges) = self.graph.remove_node(id).ok_or_else(|| missing_node(id))?;
        if !self.flags.skip_view_sync {
            let edge_ids: Vec<EdgeId> = edges.iter().map(|e| e.id.clone()).collect();
            self.sink.remove_edges(&edge_ids)?;
            self.sink.remove_nodes(&[id])?;
        }
        self.recompute()?;
        Ok((node, edges))
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> KgvResult<Edge> {
        let edge = self
            .graph
            .remove_edge(id)
            .ok_or_else(|| KgvError::ReferentialIntegrity(format!("edge {id} does not exist")))?;
        if !self.flags.skip_view_sync {
            self.sink.remove_edges(std::slice::from_ref(id))?;
        }
        self.recompute()?;
        Ok(edge)
    }

    // ---- export ----

    pub fn export_json(&self) -> KgvResult<String> {
        ext_json::export_json(&self.graph)
    }

    pub fn export_rdf(&self, format: RdfFormat) -> KgvResult<String> {
        ext_rdf::export_rdf(&self.graph, format)
    }
}

fn missing_node(id: NodeId) -> KgvError {
    KgvError::ReferentialIntegrity(format!("node {id} does not exist"))
}
