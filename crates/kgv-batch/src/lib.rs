//! kgv-batch: cooperative import of large graphs into a live view.

pub mod flags;
pub mod import;
pub mod sink;

pub use flags::RecomputeFlags;
pub use import::{BatchImport, ImportMode, ImportPhase, ImportStep};
pub use sink::{MemoryView, ViewSink};
