use serde::Serialize;
use thiserror::Error;

/// Which grouping path produced the sentence groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterOutcome {
    /// Average-linkage agglomerative clustering
    Hierarchical,
    /// Neighbour-by-neighbour grouping after clustering failed
    Sequential,
    /// No usable embeddings; sentences packed by token budget
    Fallback,
}

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Distance matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Distance at ({row}, {col}) is not finite")]
    NonFiniteDistance { row: usize, col: usize },

    #[error("Distance threshold {0} is not finite")]
    InvalidThreshold(f32),
}

/// Sentence groups plus the path that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    /// Sentence indices per group, ascending, groups ordered by first index
    pub groups: Vec<Vec<usize>>,
    pub outcome: ClusterOutcome,
}
