//! Density clustering of 2-D points (DBSCAN).
//!
//! Neighbourhoods are closed balls (`distance <= eps`) and include the point
//! itself, so `min_samples = 1` makes every point a core point and the result
//! is the connected components of the `eps`-graph.

use crate::contours::Point2;

/// Cluster label per input point; `None` marks noise.
pub fn dbscan(points: &[Point2], eps: f32, min_samples: usize) -> Vec<Option<usize>> {
    let n = points.len();
    let eps2 = eps * eps;
    let neighbours = |i: usize| -> Vec<usize> {
        (0..n)
            .filter(|&j| {
                let dx = points[i][0] - points[j][0];
                let dy = points[i][1] - points[j][1];
                dx * dx + dy * dy <= eps2
            })
            .collect()
    };

    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut next_label = 0usize;

    for seed in 0..n {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let seed_nb = neighbours(seed);
        if seed_nb.len() < min_samples {
            continue;
        }
        let label = next_label;
        next_label += 1;
        labels[seed] = Some(label);

        let mut queue = seed_nb;
        while let Some(j) = queue.pop() {
            if labels[j].is_none() {
                labels[j] = Some(label);
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;
            let nb = neighbours(j);
            if nb.len() >= min_samples {
                queue.extend(nb.into_iter().filter(|&k| !visited[k]));
            }
        }
    }
    labels
}

/// Members of the largest cluster, in input order. Ties go to the cluster
/// discovered first.
pub fn largest_cluster(labels: &[Option<usize>]) -> Vec<usize> {
    let count = labels.iter().flatten().max().map_or(0, |m| m + 1);
    let mut sizes = vec![0usize; count];
    for l in labels.iter().flatten() {
        sizes[*l] += 1;
    }
    let best = sizes
        .iter()
        .enumerate()
        .fold(None::<(usize, usize)>, |acc, (label, &size)| match acc {
            Some((_, best_size)) if best_size >= size => acc,
            _ => Some((label, size)),
        });
    match best {
        Some((label, _)) => labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| (*l == Some(label)).then_some(i))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_within_eps_form_one_cluster() {
        let pts = [[0.0, 0.0], [30.0, 0.0], [60.0, 0.0], [200.0, 0.0], [230.0, 0.0]];
        let labels = dbscan(&pts, 40.0, 1);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);
        assert_eq!(largest_cluster(&labels), vec![0, 1, 2]);
    }

    #[test]
    fn sparse_points_become_noise_with_higher_min_samples() {
        let pts = [[0.0, 0.0], [10.0, 0.0], [5.0, 5.0], [500.0, 500.0]];
        let labels = dbscan(&pts, 12.0, 3);
        assert!(labels[..3].iter().all(|l| *l == Some(0)));
        assert_eq!(labels[3], None);
    }

    #[test]
    fn empty_input() {
        let labels = dbscan(&[], 40.0, 1);
        assert!(labels.is_empty());
        assert!(largest_cluster(&labels).is_empty());
    }
}
