//! k-shell (coreness) decomposition.
//!
//! Batagelj–Zaversnik bucket peeling, O(V + E). Vertices are kept in an
//! array sorted by current degree; `bin[d]` marks where degree `d` starts.
//! Peeling a vertex decrements every neighbor whose degree is still higher
//! and moves it to the front of its bucket.
//!
//! Degrees follow the requested [`NeighborMode`] with multiplicity, so on a
//! directed network `All` counts mutual links twice. Removing `v` lowers the
//! degree of the vertices that count `v` as a neighbor, i.e. the neighbors of
//! `v` in the reversed mode.

use crate::network::{NeighborMode, Network};

impl Network {
    /// Coreness of every vertex, in vertex order.
    #[must_use]
    pub fn coreness(&self, mode: NeighborMode) -> Vec<usize> {
        let n = self.vertex_count();
        if n == 0 {
            return Vec::new();
        }

        let mut degrees = self.degrees(mode);
        let max_degree = degrees.iter().copied().max().unwrap_or(0);

        let mut vert = vec![0usize; n];
        let mut pos = vec![0usize; n];
        let mut bin = vec![0usize; max_degree + 1];

        // Histogram, then start offsets.
        for &d in &degrees {
            bin[d] += 1;
        }
        let mut start = 0;
        for b in &mut bin {
            let count = *b;
            *b = start;
            start += count;
        }

        for v in 0..n {
            let d = degrees[v];
            pos[v] = bin[d];
            vert[pos[v]] = v;
            bin[d] += 1;
        }

        // Restore bin starts.
        for d in (1..=max_degree).rev() {
            bin[d] = bin[d - 1];
        }
        bin[0] = 0;

        let reverse = mode.reversed();
        let ids: Vec<_> = self.vertices().collect();
        for i in 0..n {
            let v = vert[i];
            let deg_v = degrees[v];
            for u in self.neighbors(ids[v], reverse) {
                let u = u.index();
                if degrees[u] > deg_v {
                    let deg_u = degrees[u];
                    let pos_u = pos[u];
                    let pos_w = bin[deg_u];
                    let w = vert[pos_w];
                    if u != w {
                        pos[u] = pos_w;
                        pos[w] = pos_u;
                        vert[pos_u] = w;
                        vert[pos_w] = u;
                    }
                    bin[deg_u] += 1;
                    degrees[u] -= 1;
                }
            }
        }

        degrees
    }
}
