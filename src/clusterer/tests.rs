use super::*;

#[test]
fn test_cosine_similarity() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
    // Zero vectors are treated as dissimilar to everything
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
}

#[test]
fn test_similarity_matrix_is_symmetric() {
    let embeddings = vec![vec![1.0, 0.0], vec![0.6, 0.8], vec![0.0, 1.0]];
    let sim = similarity_matrix(&embeddings);
    for i in 0..3 {
        assert!((sim[i][i] - 1.0).abs() < 1e-6);
        for j in 0..3 {
            assert!((sim[i][j] - sim[j][i]).abs() < 1e-6);
        }
    }
    let dist = distance_matrix(&sim);
    assert!((dist[0][1] - 0.4).abs() < 1e-6);
}

#[test]
fn test_agglomerative_two_topics() {
    let embeddings = vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.9, 0.1],
        vec![0.1, 0.9],
    ];
    let dist = distance_matrix(&similarity_matrix(&embeddings));
    let groups = agglomerative(&dist, 0.3).unwrap();

    assert_eq!(groups, vec![vec![0, 2], vec![1, 3]]);
}

#[test]
fn test_agglomerative_threshold_zero_keeps_singletons() {
    let dist = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
    let groups = agglomerative(&dist, 0.0).unwrap();
    assert_eq!(groups, vec![vec![0], vec![1]]);
}

#[test]
fn test_agglomerative_uses_average_linkage() {
    // 0-1 close, 2 close to 1 but far from 0.
    // Average distance from {0,1} to 2 is (0.9 + 0.2) / 2 = 0.55.
    let dist = vec![
        vec![0.0, 0.1, 0.9],
        vec![0.1, 0.0, 0.2],
        vec![0.9, 0.2, 0.0],
    ];
    assert_eq!(
        agglomerative(&dist, 0.5).unwrap(),
        vec![vec![0, 1], vec![2]]
    );
    assert_eq!(agglomerative(&dist, 0.6).unwrap(), vec![vec![0, 1, 2]]);
}

#[test]
fn test_agglomerative_rejects_bad_input() {
    let nan = vec![vec![0.0, f32::NAN], vec![f32::NAN, 0.0]];
    assert!(matches!(
        agglomerative(&nan, 0.5),
        Err(ClusterError::NonFiniteDistance { row: 0, col: 1 })
    ));

    let ragged = vec![vec![0.0, 0.1], vec![0.1]];
    assert!(matches!(
        agglomerative(&ragged, 0.5),
        Err(ClusterError::NotSquare { row: 1, .. })
    ));

    let ok = vec![vec![0.0]];
    assert!(matches!(
        agglomerative(&ok, f32::INFINITY),
        Err(ClusterError::InvalidThreshold(_))
    ));
}

/// Full rescan of every pair per merge, for comparison
fn rescan_average_linkage(distances: &[Vec<f32>], threshold: f32) -> Vec<Vec<usize>> {
    let n = distances.len();
    let mut dist: Vec<Vec<f32>> = (0..n)
        .map(|i| (0..n).map(|j| (distances[i][j] + distances[j][i]) / 2.0).collect())
        .collect();
    let mut members: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();

    loop {
        let mut best: Option<(usize, usize, f32)> = None;
        for a in 0..n {
            for b in (a + 1)..n {
                if members[a].is_some() && members[b].is_some() && best.map_or(true, |(_, _, d)| dist[a][b] < d) {
                    best = Some((a, b, dist[a][b]));
                }
            }
        }
        let Some((a, b, d)) = best else { break };
        if d >= threshold {
            break;
        }

        let size_a = members[a].as_ref().unwrap().len() as f32;
        let size_b = members[b].as_ref().unwrap().len() as f32;
        for k in 0..n {
            if k != a && k != b && members[k].is_some() {
                let merged = (size_a * dist[a][k] + size_b * dist[b][k]) / (size_a + size_b);
                dist[a][k] = merged;
                dist[k][a] = merged;
            }
        }
        let moved = members[b].take().unwrap();
        let group = members[a].as_mut().unwrap();
        group.extend(moved);
        group.sort_unstable();
    }

    let mut groups: Vec<Vec<usize>> = members.into_iter().flatten().collect();
    groups.sort_by_key(|g| g[0]);
    groups
}

/// Deterministic pseudo-random values in [0, 1)
fn lcg(seed: u64) -> impl FnMut() -> f32 {
    let mut state = seed;
    move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 40) as f32 / (1u64 << 24) as f32
    }
}

#[test]
fn test_agglomerative_matches_full_rescan() {
    let mut next = lcg(7);
    let points: Vec<Vec<f32>> = (0..80).map(|_| vec![next() - 0.5, next() - 0.5, next() - 0.5]).collect();
    let dist = distance_matrix(&similarity_matrix(&points));

    for threshold in [0.05, 0.2, 0.5, 1.0, 1.5] {
        assert_eq!(
            agglomerative(&dist, threshold).unwrap(),
            rescan_average_linkage(&dist, threshold),
            "threshold {}",
            threshold
        );
    }
}

#[test]
fn test_agglomerative_ties_match_full_rescan() {
    // Small integer distances make equal pairs common
    let mut next = lcg(11);
    let n = 40;
    let mut dist = vec![vec![0.0f32; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = (next() * 4.0).floor() + 1.0;
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }

    for threshold in [1.5, 2.5, 3.0] {
        assert_eq!(
            agglomerative(&dist, threshold).unwrap(),
            rescan_average_linkage(&dist, threshold)
        );
    }
}

#[test]
fn test_agglomerative_many_sentences() {
    // Two well separated topics with slight jitter
    let mut next = lcg(3);
    let embeddings: Vec<Vec<f32>> = (0..400)
        .map(|i| {
            let jitter = next() * 0.05;
            if i % 2 == 0 {
                vec![1.0, jitter, 0.0]
            } else {
                vec![0.0, jitter, 1.0]
            }
        })
        .collect();
    let dist = distance_matrix(&similarity_matrix(&embeddings));

    let groups = agglomerative(&dist, 0.3).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0], (0..400).step_by(2).collect::<Vec<_>>());
    assert_eq!(groups[1], (1..400).step_by(2).collect::<Vec<_>>());
}

#[test]
fn test_sequential_breaks_on_dissimilar_neighbour() {
    let embeddings = vec![
        vec![1.0, 0.0],
        vec![0.95, 0.05],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ];
    let groups = sequential(&embeddings, 0.7);
    assert_eq!(groups, vec![vec![0, 1], vec![2], vec![3]]);
    assert!(sequential(&[], 0.7).is_empty());
}

#[test]
fn test_group_by_similarity_outcomes() {
    let clean = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
    let grouping = group_by_similarity(&clean, 0.7);
    assert_eq!(grouping.outcome, ClusterOutcome::Hierarchical);
    assert_eq!(grouping.groups, vec![vec![0, 1], vec![2]]);

    let poisoned = vec![vec![1.0, 0.0], vec![f32::NAN, 0.0], vec![1.0, 0.0]];
    let grouping = group_by_similarity(&poisoned, 0.7);
    assert_eq!(grouping.outcome, ClusterOutcome::Sequential);
    assert_eq!(grouping.groups, vec![vec![0], vec![1], vec![2]]);

    let single = vec![vec![1.0]];
    assert_eq!(group_by_similarity(&single, 0.7).groups, vec![vec![0]]);
}
