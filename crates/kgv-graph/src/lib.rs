//! kgv: the core of a knowledge graph viewer.
//!
//! Loads RDF (Turtle, N-Triples, N-Quads, RDF/XML) or JSON graph documents
//! into one node/edge model, answers `node:key=value` style queries, keeps a
//! stack of visibility filters, and feeds large imports to a live view in
//! chunks so the caller stays responsive.
//!
//! # Quick Start
//!
//! ```no_run
//! use kgv_graph::{MemoryView, QueryOutcome, Session, SourceFormat, ViewConfig};
//!
//! let mut session = Session::new(ViewConfig::default(), MemoryView::new());
//! session
//!     .ingest_blocking(
//!         r#"{"nodes":[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}],
//!             "edges":[{"from":1,"to":2,"label":"KNOWS"}]}"#,
//!         SourceFormat::Json,
//!     )
//!     .unwrap();
//!
//! match session.run("node:name=alice").unwrap() {
//!     QueryOutcome::NodeMatches(ids) => println!("matched {ids:?}"),
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! # Cooperative Import
//!
//! Ingestion runs on a worker thread. The caller polls from its own loop;
//! each poll applies at most one chunk to the view.
//!
//! ```no_run
//! use kgv_graph::{MemoryView, Session, SessionEvent, SourceFormat, ViewConfig};
//!
//! let mut session = Session::new(ViewConfig::default(), MemoryView::new());
//! let ttl = std::fs::read_to_string("people.ttl").unwrap();
//! session.start_ingest(ttl, SourceFormat::TURTLE).unwrap();
//! loop {
//!     match session.poll() {
//!         SessionEvent::Imported(summary) => {
//!             println!("{} nodes, {} edges", summary.nodes, summary.edges);
//!             break;
//!         }
//!         SessionEvent::Failed(e) => panic!("{e}"),
//!         _ => { /* redraw, handle input */ }
//!     }
//! }
//! ```
//!
//! # Filters
//!
//! ```no_run
//! # use kgv_graph::{MemoryView, Session, ViewConfig};
//! # let mut session = Session::new(ViewConfig::default(), MemoryView::new());
//! session.run("filter node:type=Person").unwrap();
//! session.run("filter edge:label=knows").unwrap();
//! println!("{:?}", session.stats());
//! session.run("reset").unwrap();
//! ```

// ---- Core API ----

pub use kgv_api::{HELP_TEXT, ImportSummary, QueryOutcome, Session, SessionEvent};

// ---- Graph Model ----

pub use kgv_types::{Edge, Graph, GraphStats, Node, NodeKind, Props};

// ---- Queries ----

pub use kgv_parser::{Intent, ParseError, PropertyQuery, Target, parse};

// ---- Filters and Search ----

pub use kgv_filter::{
    Filter, FilterKind, FilterSet, Hits, SearchOutcome, Suggestion, apply_filters, search,
};

// ---- Ingestion ----

pub use kgv_ingest::{
    IngestHandle, IngestOutput, IngestReport, IngestStage, IngestWorker, SourceFormat, ingest,
};

// ---- View Import ----

pub use kgv_batch::{BatchImport, ImportMode, ImportPhase, ImportStep, MemoryView, ViewSink};

// ---- Error Handling ----

pub use kgv_common::{KgvError, KgvResult};

// ---- Configuration ----

pub use kgv_common::{CancelToken, ViewConfig};

// ---- Identifiers ----

pub use kgv_common::{EdgeId, FilterId, NodeId};

/// Format-specific readers and writers.
pub mod formats {
    pub use ext_json::{export_json, ingest_json};
    pub use ext_rdf::{
        RdfFormat, Term, TermInterner, Triple, compile, export_rdf, parse_text, vocab,
    };
}
