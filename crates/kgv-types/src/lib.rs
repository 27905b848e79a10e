//! kgv-types: the canonical graph model shared by every pipeline.
//!
//! A [`Graph`] is a pair of node and edge lists plus id indexes. Ingestion
//! pipelines build one in bulk; the filter engine only ever touches the
//! derived `hidden` flags.

pub mod edge;
pub mod graph;
pub mod node;
pub mod props;

pub use edge::Edge;
pub use graph::{Graph, GraphStats};
pub use node::{Node, NodeKind};
pub use props::{Props, truncate_label};
