use crate::clusterer::similarity::cosine_similarity;

/// Walk sentences in order and open a new group whenever a sentence is less
/// similar than `threshold` to the last sentence of the open group.
pub fn sequential(embeddings: &[Vec<f32>], threshold: f32) -> Vec<Vec<usize>> {
    if embeddings.is_empty() {
        return vec![];
    }

    let mut groups = Vec::new();
    let mut current = vec![0];

    for i in 1..embeddings.len() {
        let last = current[current.len() - 1];
        // NaN similarities never reach the threshold
        if cosine_similarity(&embeddings[last], &embeddings[i]) >= threshold {
            current.push(i);
        } else {
            groups.push(std::mem::replace(&mut current, vec![i]));
        }
    }

    groups.push(current);
    groups
}
