mod agglomerative;
mod sequential;
mod similarity;
mod types;

#[cfg(test)]
mod tests;

pub use agglomerative::agglomerative;
pub use sequential::sequential;
pub use similarity::{cosine_distance, cosine_similarity, distance_matrix, similarity_matrix};
pub use types::{ClusterError, ClusterOutcome, Grouping};

use tracing::warn;

/// Group sentence embeddings by similarity.
///
/// Runs average-linkage clustering with distance threshold
/// `1 - similarity_threshold`; if clustering fails, falls back to sequential
/// grouping at the same similarity threshold.
pub fn group_by_similarity(embeddings: &[Vec<f32>], similarity_threshold: f32) -> Grouping {
    if embeddings.len() <= 1 {
        return Grouping {
            groups: (0..embeddings.len()).map(|i| vec![i]).collect(),
            outcome: ClusterOutcome::Hierarchical,
        };
    }

    let distances = distance_matrix(&similarity_matrix(embeddings));

    match agglomerative(&distances, 1.0 - similarity_threshold) {
        Ok(groups) => Grouping {
            groups,
            outcome: ClusterOutcome::Hierarchical,
        },
        Err(e) => {
            warn!(error = %e, "clustering failed, using sequential grouping");
            Grouping {
                groups: sequential(embeddings, similarity_threshold),
                outcome: ClusterOutcome::Sequential,
            }
        }
    }
}
