//! kgv-filter: standing filters, visibility and property search.
//!
//! Searches (`node:`/`edge:`) only report matches. Filters
//! (`filter node:`/`filter edge:`) are kept in a [`FilterSet`] and turned
//! into `hidden` flags by [`apply_filters`].

pub mod filter;
pub mod matching;
pub mod search;
pub mod visibility;

pub use filter::{Filter, FilterKind, FilterSet};
pub use search::{Hits, SearchOutcome, Suggestion, search};
pub use visibility::{KeepSet, apply_filters, compute_keep_set};
