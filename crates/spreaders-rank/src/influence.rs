//! Local influence metric `G`.
//!
//! # Definition
//!
//! For a per-vertex attribute `X` (coreness, in practice):
//!
//! ```text
//! G(v) = Σ_{w ∈ N_r(v)} X[v] · X[w] / d(v, w)²
//! ```
//!
//! where `N_r(v)` is the radius-`r` neighborhood of `v` without `v` itself.
//! The neighborhood is grown level by level exactly `r` times; the level at
//! which a vertex is first reached fixes its distance.
//!
//! Isolated vertices (and vertices whose neighborhood is empty) score 0.

use anyhow::{Result, ensure};
use fixedbitset::FixedBitSet;
use spreaders_core::{NeighborMode, Network, VertexId};
use tracing::instrument;

/// Default neighborhood radius.
pub const DEFAULT_RADIUS: usize = 3;

/// Vertices within `radius` hops of `source` with their hop distance,
/// in discovery order. `source` is excluded.
#[must_use]
pub fn neighborhood(network: &Network, source: VertexId, radius: usize) -> Vec<(VertexId, usize)> {
    let mut seen = FixedBitSet::with_capacity(network.vertex_count());
    let mut found = Vec::new();
    if !network.contains(source) {
        return found;
    }
    seen.insert(source.index());

    let mut frontier = vec![source];
    for hop in 1..=radius {
        let mut next = Vec::new();
        for &v in &frontier {
            for w in network.neighbors(v, NeighborMode::All) {
                if !seen.contains(w.index()) {
                    seen.insert(w.index());
                    found.push((w, hop));
                    next.push(w);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    found
}

/// `G` over attribute values `x` (one per vertex) within `radius` hops.
///
/// # Errors
///
/// Returns an error when `x` does not hold one value per vertex.
#[instrument(skip(network, x), fields(vertices = network.vertex_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn local_influence(network: &Network, x: &[f64], radius: usize) -> Result<Vec<f64>> {
    ensure!(
        x.len() == network.vertex_count(),
        "attribute has {} values, network has {} vertices",
        x.len(),
        network.vertex_count()
    );

    let scores = network
        .vertices()
        .map(|v| {
            let xv = x[v.index()];
            neighborhood(network, v, radius)
                .into_iter()
                .map(|(w, d)| xv * x[w.index()] / (d * d) as f64)
                .sum()
        })
        .collect();
    Ok(scores)
}
