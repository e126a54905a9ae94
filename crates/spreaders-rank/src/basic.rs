//! Degree baseline and seed-set dispersion.

use anyhow::Result;
use spreaders_core::{AttrKey, NeighborMode, Network, Ranking, VertexId};
use tracing::instrument;

/// Degree of every vertex (all edges), published under
/// `AttrKey::Score(Ranking::Degree)`.
///
/// # Errors
///
/// Propagates attribute store errors.
#[allow(clippy::cast_precision_loss)]
pub fn degree_scores(network: &mut Network) -> Result<Vec<f64>> {
    let scores: Vec<f64> = network
        .degrees(NeighborMode::All)
        .into_iter()
        .map(|d| d as f64)
        .collect();
    network.set_numeric(AttrKey::Score(Ranking::Degree), scores.clone())?;
    Ok(scores)
}

/// Mean shortest-path length over every pair of seeds.
///
/// A single seed disperses to 1.0 and unreachable pairs are left out of the
/// mean. Returns 0.0 when no pair is connected.
#[must_use]
#[instrument(skip(network, seeds), fields(seeds = seeds.len()))]
#[allow(clippy::cast_precision_loss)]
pub fn seed_dispersion(network: &Network, seeds: &[VertexId]) -> f64 {
    if seeds.len() == 1 {
        return 1.0;
    }
    let mut total = 0usize;
    let mut pairs = 0usize;
    for (i, &a) in seeds.iter().enumerate() {
        let dist = network.bfs_distances(a, NeighborMode::All);
        for &b in &seeds[i + 1..] {
            if let Some(d) = dist.get(b.index()).copied().flatten() {
                total += d;
                pairs += 1;
            }
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total as f64 / pairs as f64
    }
}
