use std::cmp::Ordering;
use std::collections::HashMap;

use crate::ir::TaskId;

use super::ranking::Adjacency;

/// Barycenter crossing reduction. Each iteration runs a top-down sweep
/// (ordering by in-neighbours in the previous layer) followed by a
/// bottom-up sweep (ordering by out-neighbours in the next layer). Layer
/// membership never changes.
pub fn order_layers(
    layers: &[Vec<TaskId>],
    adjacency: &Adjacency,
    iterations: usize,
) -> Vec<Vec<TaskId>> {
    let mut ordered = layers.to_vec();
    if ordered.len() <= 1 {
        return ordered;
    }

    for _ in 0..iterations {
        for rank in 1..ordered.len() {
            let pivot = index_of(&ordered[rank - 1]);
            sort_by_barycenter(&mut ordered[rank], &pivot, |id| adjacency.incoming(id));
        }
        for rank in (0..ordered.len() - 1).rev() {
            let pivot = index_of(&ordered[rank + 1]);
            sort_by_barycenter(&mut ordered[rank], &pivot, |id| adjacency.outgoing(id));
        }
    }

    ordered
}

fn index_of(layer: &[TaskId]) -> HashMap<TaskId, usize> {
    layer
        .iter()
        .enumerate()
        .map(|(idx, id)| (*id, idx))
        .collect()
}

fn sort_by_barycenter<'a, F>(layer: &mut [TaskId], pivot: &HashMap<TaskId, usize>, neighbors: F)
where
    F: Fn(TaskId) -> &'a [TaskId],
{
    if layer.len() <= 1 {
        return;
    }
    let mut keyed: Vec<(f32, TaskId)> = layer
        .iter()
        .map(|id| (barycenter(neighbors(*id), pivot), *id))
        .collect();
    keyed.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
    for (slot, (_, id)) in layer.iter_mut().zip(keyed) {
        *slot = id;
    }
}

/// Mean index of the neighbours placed in `pivot`; `+inf` when none are.
fn barycenter(neighbors: &[TaskId], pivot: &HashMap<TaskId, usize>) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for neighbor in neighbors {
        if let Some(idx) = pivot.get(neighbor) {
            sum += *idx as f32;
            count += 1;
        }
    }
    if count == 0 {
        f32::INFINITY
    } else {
        sum / count as f32
    }
}

/// Number of pairwise crossings between adjacent layers.
pub fn count_crossings(layers: &[Vec<TaskId>], adjacency: &Adjacency) -> usize {
    let mut total = 0;
    for pair in layers.windows(2) {
        let upper = index_of(&pair[0]);
        let lower = index_of(&pair[1]);
        let mut segments: Vec<(usize, usize)> = Vec::new();
        for id in &pair[0] {
            for next in adjacency.outgoing(*id) {
                if let Some(to) = lower.get(next) {
                    segments.push((upper[id], *to));
                }
            }
        }
        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
                    total += 1;
                }
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::DependencyEdge;

    fn adjacency(nodes: &[TaskId], pairs: &[(TaskId, TaskId)]) -> Adjacency {
        let edges: Vec<DependencyEdge> = pairs
            .iter()
            .map(|(from, to)| DependencyEdge::new(*from, *to))
            .collect();
        Adjacency::new(nodes, &edges)
    }

    #[test]
    fn zero_iterations_returns_input() {
        let adj = adjacency(&[1, 2, 3], &[(1, 3), (2, 3)]);
        let layers = vec![vec![2, 1], vec![3]];
        assert_eq!(order_layers(&layers, &adj, 0), layers);
    }

    #[test]
    fn untangles_a_simple_crossing() {
        // 1 -> 4, 2 -> 3: with the second layer in id order the edges cross.
        let adj = adjacency(&[1, 2, 3, 4], &[(1, 4), (2, 3)]);
        let layers = vec![vec![1, 2], vec![3, 4]];
        assert_eq!(count_crossings(&layers, &adj), 1);
        let ordered = order_layers(&layers, &adj, 3);
        assert_eq!(count_crossings(&ordered, &adj), 0);
        assert_eq!(ordered[0], vec![1, 2]);
        assert_eq!(ordered[1], vec![4, 3]);
    }

    #[test]
    fn membership_is_preserved() {
        let adj = adjacency(
            &[1, 2, 3, 4, 5, 6],
            &[(1, 5), (2, 4), (3, 6), (1, 6), (3, 4)],
        );
        let layers = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let ordered = order_layers(&layers, &adj, 3);
        for (before, after) in layers.iter().zip(&ordered) {
            let mut a = before.clone();
            let mut b = after.clone();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn nodes_without_placed_neighbors_sink_to_the_end() {
        // 9 has no predecessor in layer 0, so it follows 3 and 2.
        let adj = adjacency(&[1, 2, 3, 9], &[(1, 3), (1, 2)]);
        let layers = vec![vec![1], vec![9, 3, 2]];
        let ordered = order_layers(&layers, &adj, 1);
        assert_eq!(ordered[1], vec![2, 3, 9]);
    }

    #[test]
    fn ordering_reaches_a_fixed_point() {
        let adj = adjacency(
            &[1, 2, 3, 4, 5, 6],
            &[(1, 4), (2, 3), (3, 6), (4, 5)],
        );
        let layers = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        let once = order_layers(&layers, &adj, 3);
        let twice = order_layers(&once, &adj, 3);
        assert_eq!(once, twice);
        assert_eq!(count_crossings(&once, &adj), 0);
    }

    #[test]
    fn single_layer_is_untouched() {
        let adj = adjacency(&[3, 1, 2], &[]);
        let layers = vec![vec![3, 1, 2]];
        assert_eq!(order_layers(&layers, &adj, 3), layers);
    }
}
