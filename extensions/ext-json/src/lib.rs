//! ext-json: JSON node/edge document ingestion and export for KgView.
//!
//! Ingestion accepts the loose shapes graph tools emit (`edges` or `links`,
//! `from`/`to` or `source`/`target`, numeric or string ids) and normalizes
//! them into the canonical graph. Export writes the shape ingestion reads
//! back, including RDF provenance (`type`, `iri`, `bnode`, `value`, `lang`,
//! `datatype`).

pub mod export;
pub mod ingest;

pub use export::export_json;
pub use ingest::{IngestReport, JsonImport, ingest_json};
