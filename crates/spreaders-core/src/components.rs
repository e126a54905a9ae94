//! Weakly connected components.
//!
//! Edges are followed in both directions. Components are numbered in the
//! order of their lowest vertex, so the numbering is stable for a given
//! vertex order.

use fixedbitset::FixedBitSet;

use crate::network::{NeighborMode, Network};

impl Network {
    /// Component index of every vertex, in vertex order.
    #[must_use]
    pub fn connected_components(&self) -> Vec<usize> {
        let n = self.vertex_count();
        let mut membership = vec![0usize; n];
        let mut visited = FixedBitSet::with_capacity(n);
        let mut next = 0usize;

        for start in self.vertices() {
            if visited.contains(start.index()) {
                continue;
            }

            // DFS from start, treating edges as undirected
            let mut stack = vec![start];
            visited.insert(start.index());
            while let Some(v) = stack.pop() {
                membership[v.index()] = next;
                for w in self.neighbors(v, NeighborMode::All) {
                    if !visited.contains(w.index()) {
                        visited.insert(w.index());
                        stack.push(w);
                    }
                }
            }
            next += 1;
        }

        membership
    }

    /// Number of weakly connected components (0 for an empty network).
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.connected_components()
            .iter()
            .max()
            .map_or(0, |&max| max + 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::network::Network;

    #[test]
    fn empty_network_has_no_components() {
        let net = Network::new(false);
        assert!(net.connected_components().is_empty());
        assert_eq!(net.component_count(), 0);
    }

    #[test]
    fn numbered_by_lowest_vertex() {
        let net = Network::with_vertices(
            false,
            &["x", "a", "b", "c", "d"],
            &[("c", "d"), ("a", "b")],
        );
        // x isolated → 0, a-b → 1, c-d → 2
        assert_eq!(net.connected_components(), vec![0, 1, 1, 2, 2]);
        assert_eq!(net.component_count(), 3);
    }

    #[test]
    fn directed_edges_are_weakly_connected() {
        let net = Network::from_edges(true, &[("a", "b"), ("c", "b")]);
        assert_eq!(net.component_count(), 1);
    }
}
