//! Multilevel (Louvain) modularity communities.
//!
//! # Algorithm
//!
//! 1. **Local moves**: visit vertices in order; move each into the
//!    neighboring community with the largest modularity gain
//!    `k_i,in − γ · Σ_tot · k_i / 2m`, repeating sweeps until nothing moves.
//! 2. **Aggregation**: collapse every community into a single weighted
//!    vertex (internal edges become a self-loop weight) and repeat.
//!
//! Stops when a level produces no move. Edge direction is ignored; on a
//! directed network a mutual link weighs 2.
//!
//! The visit order is the vertex order and candidate communities are
//! scanned in ascending id, so the partition is deterministic. Final
//! community ids are renumbered in order of first appearance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::network::{NeighborMode, Network};

/// Tuning for [`Network::louvain_communities`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LouvainConfig {
    /// Resolution γ; 1.0 is classic modularity.
    pub resolution: f64,
    /// Maximum number of aggregation levels.
    pub max_levels: usize,
    /// Maximum local-move sweeps per level.
    pub max_sweeps: usize,
    /// A move must beat staying put by more than this.
    pub min_gain: f64,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_levels: 32,
            max_sweeps: 100,
            min_gain: 1e-10,
        }
    }
}

/// A community assignment for every vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Community id per vertex, in vertex order.
    pub membership: Vec<usize>,
    /// Modularity of `membership` at the configured resolution.
    pub modularity: f64,
    /// Number of distinct communities.
    pub community_count: usize,
}

impl Network {
    /// Partition the network into modularity communities.
    #[must_use]
    #[instrument(skip(self, config), fields(vertices = self.vertex_count()))]
    pub fn louvain_communities(&self, config: &LouvainConfig) -> Partition {
        let mut level = LevelGraph::from_network(self);
        let mut membership: Vec<usize> = (0..self.vertex_count()).collect();

        for depth in 0..config.max_levels {
            let Some(local) = level.local_moves(config) else {
                break;
            };
            // ids are positional over this level's nodes
            let (renumbered, count) = renumber(&local);
            for m in &mut membership {
                *m = renumbered[*m];
            }
            debug!(depth, communities = count, "louvain level done");
            if count == level.len() {
                break;
            }
            level = level.aggregate(&renumbered, count);
        }

        let (membership, community_count) = renumber(&membership);
        let modularity = self.modularity(&membership, config.resolution);
        Partition {
            membership,
            modularity,
            community_count,
        }
    }

    /// Modularity of a membership vector, ignoring edge direction.
    ///
    /// `Q = Σ_c [ L_c / m − γ (d_c / 2m)² ]`; 0 for a network without edges.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn modularity(&self, membership: &[usize], resolution: f64) -> f64 {
        let m = self.edge_count() as f64;
        if m == 0.0 || membership.len() != self.vertex_count() {
            return 0.0;
        }
        let communities = membership.iter().copied().max().map_or(0, |c| c + 1);
        let mut internal = vec![0.0; communities];
        let mut degree = vec![0.0; communities];

        for v in self.vertices() {
            let cv = membership[v.index()];
            degree[cv] += self.degree(v, NeighborMode::All) as f64;
            for w in self.neighbors(v, NeighborMode::Out) {
                if membership[w.index()] == cv {
                    internal[cv] += 1.0;
                }
            }
        }

        internal
            .iter()
            .zip(&degree)
            .map(|(l, d)| l / m - resolution * (d / (2.0 * m)).powi(2))
            .sum()
    }
}

/// Renumber labels in order of first appearance.
///
/// Returns the new id of every position plus the number of distinct labels.
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut map: BTreeMap<usize, usize> = BTreeMap::new();
    let mut out = Vec::with_capacity(labels.len());
    for &label in labels {
        let next = map.len();
        out.push(*map.entry(label).or_insert(next));
    }
    (out, map.len())
}

// ---------------------------------------------------------------------------
// Weighted working graph for one level
// ---------------------------------------------------------------------------

struct LevelGraph {
    /// Weighted neighbors (no self entries).
    adj: Vec<Vec<(usize, f64)>>,
    /// Total weight of edges folded into each node.
    loops: Vec<f64>,
}

impl LevelGraph {
    fn from_network(network: &Network) -> Self {
        let n = network.vertex_count();
        let mut acc: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for v in network.vertices() {
            for w in network.neighbors(v, NeighborMode::Out) {
                *acc[v.index()].entry(w.index()).or_insert(0.0) += 1.0;
                *acc[w.index()].entry(v.index()).or_insert(0.0) += 1.0;
            }
        }
        Self {
            adj: acc.into_iter().map(|m| m.into_iter().collect()).collect(),
            loops: vec![0.0; n],
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    fn node_degree(&self, i: usize) -> f64 {
        self.adj[i].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.loops[i]
    }

    /// One level of local moves. `None` when no node changed community.
    fn local_moves(&self, config: &LouvainConfig) -> Option<Vec<usize>> {
        let n = self.len();
        let degree: Vec<f64> = (0..n).map(|i| self.node_degree(i)).collect();
        let two_m: f64 = degree.iter().sum();
        if two_m == 0.0 {
            return None;
        }

        let mut community: Vec<usize> = (0..n).collect();
        let mut totals = degree.clone();
        let mut moved_any = false;

        for _ in 0..config.max_sweeps {
            let mut moved = false;
            for i in 0..n {
                let current = community[i];
                let ki = degree[i];

                let mut links: BTreeMap<usize, f64> = BTreeMap::new();
                for &(j, w) in &self.adj[i] {
                    *links.entry(community[j]).or_insert(0.0) += w;
                }

                totals[current] -= ki;
                let stay = links.get(&current).copied().unwrap_or(0.0);
                let mut best = current;
                let mut best_gain = stay - config.resolution * totals[current] * ki / two_m;
                for (&c, &w) in &links {
                    let gain = w - config.resolution * totals[c] * ki / two_m;
                    if gain > best_gain + config.min_gain {
                        best = c;
                        best_gain = gain;
                    }
                }
                totals[best] += ki;

                if best != current {
                    community[i] = best;
                    moved = true;
                    moved_any = true;
                }
            }
            if !moved {
                break;
            }
        }

        moved_any.then_some(community)
    }

    /// Collapse nodes into `count` communities given per-node ids.
    fn aggregate(&self, ids: &[usize], count: usize) -> Self {
        let mut acc: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut loops = vec![0.0; count];
        for (i, neighbors) in self.adj.iter().enumerate() {
            let ci = ids[i];
            loops[ci] += self.loops[i];
            for &(j, w) in neighbors {
                let cj = ids[j];
                if ci == cj {
                    // each internal edge is seen from both ends
                    loops[ci] += w / 2.0;
                } else {
                    *acc[ci].entry(cj).or_insert(0.0) += w;
                }
            }
        }
        Self {
            adj: acc.into_iter().map(|m| m.into_iter().collect()).collect(),
            loops,
        }
    }
}
