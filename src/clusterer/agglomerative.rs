use crate::clusterer::types::ClusterError;

/// Average-linkage agglomerative clustering over a precomputed distance matrix.
///
/// There is no target cluster count: the two closest clusters keep merging
/// while their average distance is strictly below `threshold`. Ties go to the
/// lowest index pair, so the result only depends on the input.
///
/// Each active cluster caches its nearest neighbour, so a merge only rescans
/// the rows that pointed at one of the merged clusters.
///
/// Returns groups of indices (ascending), ordered by their first index.
pub fn agglomerative(distances: &[Vec<f32>], threshold: f32) -> Result<Vec<Vec<usize>>, ClusterError> {
    let n = distances.len();
    validate(distances, threshold)?;

    // Symmetrize so row and column reads agree
    let mut dist: Vec<Vec<f32>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| (distances[i][j] + distances[j][i]) / 2.0)
                .collect()
        })
        .collect();

    let mut members: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();
    let mut nearest: Vec<Option<(usize, f32)>> = (0..n).map(|i| nearest_of(&dist, &members, i)).collect();

    loop {
        let Some((a, b, d)) = closest_pair(&nearest, &members) else {
            break;
        };
        if d >= threshold {
            break;
        }

        let size_a = members[a].as_ref().map_or(0, Vec::len) as f32;
        let size_b = members[b].as_ref().map_or(0, Vec::len) as f32;

        // Lance-Williams update for average linkage
        for k in 0..n {
            if k == a || k == b || members[k].is_none() {
                continue;
            }
            let merged = (size_a * dist[a][k] + size_b * dist[b][k]) / (size_a + size_b);
            dist[a][k] = merged;
            dist[k][a] = merged;
        }

        let moved = members[b].take().unwrap_or_default();
        if let Some(group) = members[a].as_mut() {
            group.extend(moved);
            group.sort_unstable();
        }
        nearest[b] = None;
        nearest[a] = nearest_of(&dist, &members, a);

        // Only rows that pointed at a or b can lose their neighbour;
        // every other row just compares against the merged cluster
        for k in 0..n {
            if k == a || members[k].is_none() {
                continue;
            }
            nearest[k] = match nearest[k] {
                Some((j, _)) if j == a || j == b => nearest_of(&dist, &members, k),
                Some((j, best)) if dist[k][a] < best || (dist[k][a] == best && a < j) => Some((a, dist[k][a])),
                cached => cached,
            };
        }
    }

    let mut groups: Vec<Vec<usize>> = members.into_iter().flatten().collect();
    groups.sort_by_key(|g| g[0]);
    Ok(groups)
}

fn validate(distances: &[Vec<f32>], threshold: f32) -> Result<(), ClusterError> {
    if !threshold.is_finite() {
        return Err(ClusterError::InvalidThreshold(threshold));
    }

    let n = distances.len();
    for (row, values) in distances.iter().enumerate() {
        if values.len() != n {
            return Err(ClusterError::NotSquare {
                row,
                len: values.len(),
                expected: n,
            });
        }
        if let Some(col) = values.iter().position(|d| !d.is_finite()) {
            return Err(ClusterError::NonFiniteDistance { row, col });
        }
    }

    Ok(())
}

/// Closest other active cluster to `i`; ties go to the lowest index
fn nearest_of(dist: &[Vec<f32>], members: &[Option<Vec<usize>>], i: usize) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (j, d) in dist[i].iter().copied().enumerate() {
        if j == i || members[j].is_none() {
            continue;
        }
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((j, d));
        }
    }

    best
}

/// Globally closest pair from the per-row cache. Scanning rows in order and
/// taking the first strict minimum yields the lowest index pair on ties.
fn closest_pair(nearest: &[Option<(usize, f32)>], members: &[Option<Vec<usize>>]) -> Option<(usize, usize, f32)> {
    let mut best: Option<(usize, usize, f32)> = None;

    for (i, cached) in nearest.iter().enumerate() {
        let Some((j, d)) = *cached else {
            continue;
        };
        if members[i].is_none() {
            continue;
        }
        if best.map_or(true, |(_, _, best_d)| d < best_d) {
            best = Some((i.min(j), i.max(j), d));
        }
    }

    best
}
