//! kgv-common: shared types, error taxonomy, IDs.

pub mod cancel;
pub mod config;
pub mod error;
pub mod id;

pub use cancel::CancelToken;
pub use config::ViewConfig;
pub use error::{KgvError, KgvResult};
pub use id::{EdgeId, FilterId, NodeId};
