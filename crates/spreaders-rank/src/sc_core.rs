//! Similarity-weighted edge score (SC-core).
//!
//! For every adjacent pair the edge is weighted from the near endpoint `v`
//! towards the far endpoint `w`:
//!
//! ```text
//! weight(v → w) = 1 + k_out(w | v) · (1 + D / 4)^α
//! k_out(w | v)  = |N(w) \ (N(v) ∪ {v})|
//! D             = #simple paths v..w of length ≤ 2, minus 1
//! ```
//!
//! A vertex scores the sum of the weights towards each of its neighbors.

use std::collections::HashSet;

use anyhow::{Result, ensure};
use spreaders_core::{AttrKey, NeighborMode, Network, Ranking, VertexId};
use tracing::instrument;

pub const DEFAULT_ALPHA: f64 = 0.5;

/// Neighbors of `w` outside `v`'s closed neighborhood.
#[must_use]
pub fn outside_degree(network: &Network, v: VertexId, w: VertexId) -> usize {
    let mut closed: HashSet<VertexId> = network.distinct_neighbors(v, NeighborMode::All).into_iter().collect();
    closed.insert(v);
    network
        .distinct_neighbors(w, NeighborMode::All)
        .into_iter()
        .filter(|x| !closed.contains(x))
        .count()
}

/// Short alternative routes between adjacent `v` and `w`.
#[must_use]
pub fn redundancy(network: &Network, v: VertexId, w: VertexId) -> usize {
    network.simple_paths(v, w, 2).len().saturating_sub(1)
}

/// Score every vertex.
///
/// Published under `AttrKey::Score(Ranking::ScCore)`.
///
/// # Errors
///
/// Rejects a non-finite `alpha`; propagates attribute store errors.
#[instrument(skip(network))]
#[allow(clippy::cast_precision_loss)]
pub fn sc_core(network: &mut Network, alpha: f64) -> Result<Vec<f64>> {
    ensure!(alpha.is_finite(), "alpha must be finite, got {alpha}");

    let scores: Vec<f64> = network
        .vertices()
        .map(|v| {
            network
                .distinct_neighbors(v, NeighborMode::All)
                .into_iter()
                .map(|w| {
                    let k_out = outside_degree(network, v, w) as f64;
                    let d = redundancy(network, v, w) as f64;
                    k_out.mul_add((1.0 + d / 4.0).powf(alpha), 1.0)
                })
                .sum()
        })
        .collect();

    network.set_numeric(AttrKey::Score(Ranking::ScCore), scores.clone())?;
    Ok(scores)
}
