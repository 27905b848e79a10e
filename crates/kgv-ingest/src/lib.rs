//! kgv-ingest: format detection, the ingestion pipeline and its worker.
//!
//! [`ingest`] runs JSON or RDF ingestion on the calling thread.
//! [`IngestWorker::spawn`] runs the same pipeline on its own thread and
//! talks to the caller only through [`WorkerMessage`]s.

pub mod format;
pub mod pipeline;
pub mod worker;

pub use format::SourceFormat;
pub use pipeline::{IngestOutput, IngestReport, IngestStage, ingest, ingest_with_progress};
pub use worker::{IngestHandle, IngestRequest, IngestWorker, WorkerMessage};
