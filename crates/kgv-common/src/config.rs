/// Tuning knobs for ingestion, batched import and query feedback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewConfig {
    /// Node + edge count at or above which an import is applied in chunks. Default: 6000.
    pub big_import_threshold: usize,
    /// Nodes applied per chunk. Default: 3000.
    pub node_batch_size: usize,
    /// Edges applied per chunk. Default: 4000.
    pub edge_batch_size: usize,
    /// Display labels longer than this many chars are truncated with an ellipsis. Default: 64.
    pub label_max_chars: usize,
    /// Maximum number of contains() suggestions returned on a miss. Default: 12.
    pub suggestion_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            big_import_threshold: 6000,
            node_batch_size: 3000,
            edge_batch_size: 4000,
            label_max_chars: 64,
            suggestion_limit: 12,
        }
    }
}

impl ViewConfig {
    /// Node chunk size, never zero.
    pub fn node_chunk(&self) -> usize {
        self.node_batch_size.max(1)
    }

    /// Edge chunk size, never zero.
    pub fn edge_chunk(&self) -> usize {
        self.edge_batch_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = ViewConfig::default();
        assert_eq!(config.big_import_threshold, 6000);
        assert_eq!(config.node_batch_size, 3000);
        assert_eq!(config.edge_batch_size, 4000);
        assert_eq!(config.label_max_chars, 64);
        assert_eq!(config.suggestion_limit, 12);
    }

    #[test]
    fn zero_batch_sizes_are_clamped() {
        let config = ViewConfig {
            node_batch_size: 0,
            edge_batch_size: 0,
            ..ViewConfig::default()
        };
        assert_eq!(config.node_chunk(), 1);
        assert_eq!(config.edge_chunk(), 1);
    }
}
