//! kgv-api: the [`Session`] a front end drives.
//!
//! A session owns the canonical graph, the standing filters and a
//! [`ViewSink`](kgv_batch::ViewSink). Ingestion runs on a worker thread and
//! is applied in chunks through [`Session::poll`]; queries run through
//! [`Session::run`].

pub mod help;
pub mod outcome;
pub mod session;

pub use help::HELP_TEXT;
pub use outcome::{ImportSummary, QueryOutcome, SessionEvent};
pub use session::Session;
