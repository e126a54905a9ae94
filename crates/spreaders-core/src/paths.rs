//! Unweighted path queries: BFS distances, eccentricity, bounded simple
//! paths.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::network::{NeighborMode, Network, VertexId};

impl Network {
    /// Hop distance from `source` to every vertex (`None` if unreachable).
    #[must_use]
    pub fn bfs_distances(&self, source: VertexId, mode: NeighborMode) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.vertex_count()];
        if !self.contains(source) {
            return dist;
        }
        dist[source.index()] = Some(0);
        let mut queue = VecDeque::from([(source, 0usize)]);
        while let Some((v, d)) = queue.pop_front() {
            for w in self.neighbors(v, mode) {
                if dist[w.index()].is_none() {
                    dist[w.index()] = Some(d + 1);
                    queue.push_back((w, d + 1));
                }
            }
        }
        dist
    }

    /// Largest finite distance from `v`; unreachable vertices are ignored,
    /// so an isolated vertex has eccentricity 0.
    #[must_use]
    pub fn eccentricity(&self, v: VertexId, mode: NeighborMode) -> usize {
        self.bfs_distances(v, mode)
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(0)
    }

    /// Shortest hop count between `a` and `b`, ignoring edge direction.
    #[must_use]
    pub fn shortest_path_len(&self, a: VertexId, b: VertexId) -> Option<usize> {
        if !self.contains(b) {
            return None;
        }
        self.bfs_distances(a, NeighborMode::All)[b.index()]
    }

    /// Every simple path from `source` to `target` with at most `max_hops`
    /// edges, ignoring edge direction. Paths are vertex sequences including
    /// both endpoints.
    #[must_use]
    pub fn simple_paths(
        &self,
        source: VertexId,
        target: VertexId,
        max_hops: usize,
    ) -> Vec<Vec<VertexId>> {
        let mut paths = Vec::new();
        if !self.contains(source) || !self.contains(target) || source == target {
            return paths;
        }

        let mut on_path = FixedBitSet::with_capacity(self.vertex_count());
        let mut path = vec![source];
        on_path.insert(source.index());
        self.extend_paths(target, max_hops, &mut path, &mut on_path, &mut paths);
        paths
    }

    fn extend_paths(
        &self,
        target: VertexId,
        max_hops: usize,
        path: &mut Vec<VertexId>,
        on_path: &mut FixedBitSet,
        paths: &mut Vec<Vec<VertexId>>,
    ) {
        let Some(&last) = path.last() else {
            return;
        };
        if path.len() > max_hops {
            return;
        }
        for w in self.distinct_neighbors(last, NeighborMode::All) {
            if on_path.contains(w.index()) {
                continue;
            }
            if w == target {
                let mut found = path.clone();
                found.push(w);
                paths.push(found);
                continue;
            }
            path.push(w);
            on_path.insert(w.index());
            self.extend_paths(target, max_hops, path, on_path, paths);
            on_path.set(w.index(), false);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::network::{NeighborMode, Network};

    fn cycle(n: usize) -> Network {
        let names: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
        let edges: Vec<(&str, &str)> = (0..n)
            .map(|i| (names[i].as_str(), names[(i + 1) % n].as_str()))
            .collect();
        Network::from_edges(false, &edges)
    }

    #[test]
    fn cycle_eccentricity_is_half_length() {
        let net = cycle(10);
        for v in net.vertices() {
            assert_eq!(net.eccentricity(v, NeighborMode::All), 5);
        }
    }

    #[test]
    fn unreachable_vertices_are_none() {
        let net = Network::with_vertices(false, &["a", "b", "z"], &[("a", "b")]);
        let a = net.find("a").expect("a");
        let z = net.find("z").expect("z");
        assert_eq!(net.bfs_distances(a, NeighborMode::All), vec![Some(0), Some(1), None]);
        assert_eq!(net.shortest_path_len(a, z), None);
        assert_eq!(net.eccentricity(z, NeighborMode::All), 0);
    }

    #[test]
    fn directed_in_mode_walks_backwards() {
        let net = Network::from_edges(true, &[("a", "b"), ("b", "c")]);
        let c = net.find("c").expect("c");
        assert_eq!(net.eccentricity(c, NeighborMode::In), 2);
        assert_eq!(net.eccentricity(c, NeighborMode::Out), 0);
    }

    #[test]
    fn simple_paths_within_two_hops() {
        // a-b edge plus two common neighbors x, y, and a longer detour a-p-q-b
        let net = Network::from_edges(
            false,
            &[
                ("a", "b"),
                ("a", "x"),
                ("x", "b"),
                ("a", "y"),
                ("y", "b"),
                ("a", "p"),
                ("p", "q"),
                ("q", "b"),
            ],
        );
        let a = net.find("a").expect("a");
        let b = net.find("b").expect("b");
        assert_eq!(net.simple_paths(a, b, 2).len(), 3);
        assert_eq!(net.simple_paths(a, b, 3).len(), 4);
        assert!(net.simple_paths(a, a, 2).is_empty());
    }
}
